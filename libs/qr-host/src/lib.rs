//! # QR Host
//!
//! Host layer for the QR solid pipeline: the commands a CAD add-in would
//! expose, the document they place components into, and the text shown
//! when they fail.
//!
//! ## Architecture
//!
//! ```text
//! addin::run → CommandRegistry ── execute(id, inputs_json) ──► CommandHandler
//!                                                                 │
//!        QrCodeCommand / SignboardCommand → qr_solid pipeline ◄───┘
//!                                                 │
//!                                       Document (SceneSink)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use qr_host::{addin, CommandRegistry, Document};
//!
//! let mut registry = CommandRegistry::new();
//! addin::run(&mut registry);
//!
//! let mut doc = Document::new();
//! registry
//!     .execute(addin::QR_CODE_COMMAND_ID, r#"{"text": "hello"}"#, &mut doc)
//!     .unwrap();
//! assert!(doc.component("QR_Code").is_some());
//!
//! addin::stop(&mut registry);
//! assert!(registry.is_empty());
//! ```

pub mod addin;
pub mod cache;
pub mod commands;
pub mod document;
pub mod error;
pub mod messages;
pub mod registry;

pub use cache::{CacheKey, CacheStats, GenerationCache};
pub use document::{Component, ComponentId, Document};
pub use error::CommandError;
pub use registry::{CommandDefinition, CommandHandler, CommandOutcome, CommandRegistry};
