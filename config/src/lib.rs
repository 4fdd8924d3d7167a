//! # Config Crate
//!
//! Centralized configuration constants for the QR solid pipeline.
//! Tolerances, command defaults and safety limits are defined here so the
//! core, the kernel and the host layer agree on the same values.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_QR_SIZE, DEFAULT_BASE_MARGIN, EPSILON};
//!
//! // The backing plate of a default QR block overhangs on both sides.
//! let plate_width = DEFAULT_QR_SIZE + 2.0 * DEFAULT_BASE_MARGIN;
//! assert!((plate_width - 29.0).abs() < EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Unit-Consistent**: Every length is in millimetres
//! - **Host Compatible**: Defaults match the original add-in dialogs

pub mod constants;
