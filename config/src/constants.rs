//! # Configuration Constants
//!
//! Centralized constants for the QR solid pipeline. All tolerances, command
//! defaults and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **QR Defaults**: Parameters of the QR code command
//! - **Signboard Defaults**: Parameters of the signboard command
//! - **Icon Glyph**: Proportions of the rasterized icon
//! - **Limits**: Maximum values for safety bounds
//!
//! All lengths are millimetres.

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Smallest extent a solid cell may have along any axis.
///
/// Boxes thinner than this are degenerate and are rejected by the kernel;
/// fragments thinner than this left over after a box subtraction are
/// discarded as slivers.
///
/// # Example
///
/// ```rust
/// use config::constants::GEOMETRY_TOLERANCE;
///
/// let width = 0.0;
/// assert!(width <= GEOMETRY_TOLERANCE);
/// ```
pub const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// Epsilon for merging grid coordinates during mesh extraction.
///
/// Coordinates closer than this collapse onto the same grid plane, which
/// removes numerical noise from `start + col * block_size` arithmetic.
///
/// # Example
///
/// ```rust
/// use config::constants::{EPSILON, VERTEX_MERGE_EPSILON};
///
/// assert!(VERTEX_MERGE_EPSILON > EPSILON);
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

// =============================================================================
// QR CODE COMMAND DEFAULTS
// =============================================================================

/// Default text embedded by the QR code command.
pub const DEFAULT_QR_TEXT: &str = "https://example.com";

/// Default side length of the QR block.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_QR_SIZE;
///
/// // Version 1 codes have 21 modules per side.
/// let block_size = DEFAULT_QR_SIZE / 21.0;
/// assert!(block_size > 1.0);
/// ```
pub const DEFAULT_QR_SIZE: f64 = 25.0;

/// Default extrusion height of every QR module box.
pub const DEFAULT_QR_THICKNESS: f64 = 1.0;

/// Whether the QR code command builds a backing plate by default.
pub const DEFAULT_CREATE_BASE: bool = true;

/// Default plate overhang beyond the QR footprint on every side.
pub const DEFAULT_BASE_MARGIN: f64 = 2.0;

/// Default plate thickness (z-extent below the QR blocks).
pub const DEFAULT_BASE_THICKNESS: f64 = 2.0;

/// Smallest QR version requested from the encoder by default.
pub const DEFAULT_MIN_VERSION: u8 = 1;

/// Largest QR version defined by the QR Code Model 2 standard.
pub const MAX_QR_VERSION: u8 = 40;

// =============================================================================
// SIGNBOARD COMMAND DEFAULTS
// =============================================================================

/// Default board width (x-extent).
pub const DEFAULT_BOARD_WIDTH: f64 = 100.0;

/// Default board height (y-extent).
pub const DEFAULT_BOARD_HEIGHT: f64 = 150.0;

/// Default board thickness (z-extent). QR block and icon sit on top of it.
pub const DEFAULT_BOARD_THICKNESS: f64 = 5.0;

/// Default text encoded on the signboard.
pub const DEFAULT_SIGNBOARD_TEXT: &str = "https://instagram.com/example";

/// Default side length of the signboard QR block.
pub const DEFAULT_SIGNBOARD_QR_SIZE: f64 = 30.0;

/// Default `(x, y)` position of the signboard QR block center.
pub const DEFAULT_SIGNBOARD_QR_POSITION: [f64; 2] = [0.0, 40.0];

/// Height of the QR block and icon embossed onto the signboard.
pub const DEFAULT_EMBOSS_THICKNESS: f64 = 1.0;

/// Whether the signboard carries the icon by default.
pub const DEFAULT_ICON_ENABLED: bool = true;

/// Default side length of the icon.
pub const DEFAULT_ICON_SIZE: f64 = 20.0;

/// Default `(x, y)` position of the icon center.
pub const DEFAULT_ICON_POSITION: [f64; 2] = [0.0, -40.0];

// =============================================================================
// ICON GLYPH
// =============================================================================

/// Number of raster cells per side used to approximate the icon glyph.
///
/// The glyph is rasterized into a module matrix and compiled by the same
/// pipeline as a QR code.
pub const ICON_RESOLUTION: usize = 40;

/// Corner radius of the outer rounded square, as a fraction of icon size.
pub const ICON_CORNER_RADIUS_RATIO: f64 = 0.25;

/// Radius of the centered lens cut-out, as a fraction of icon size.
pub const ICON_LENS_RADIUS_RATIO: f64 = 0.25;

/// Offset of the dot cut-out from the icon center along x and y.
pub const ICON_DOT_OFFSET_RATIO: f64 = 0.35;

/// Radius of the dot cut-out, as a fraction of icon size.
pub const ICON_DOT_RADIUS_RATIO: f64 = 0.05;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum modules per side accepted by the compiler (a version 40 code).
///
/// # Example
///
/// ```rust
/// use config::constants::{qr_width_for_version, MAX_QR_MODULES, MAX_QR_VERSION};
///
/// assert_eq!(qr_width_for_version(MAX_QR_VERSION), MAX_QR_MODULES);
/// ```
pub const MAX_QR_MODULES: usize = 177;

/// Maximum number of disjoint cells a single solid may hold.
///
/// Safety limit against runaway fragmentation in the rectilinear kernel.
pub const MAX_SOLID_CELLS: usize = 1_000_000;

/// Maximum number of triangles in a single exported mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

/// Operand cell count above which the kernel splits cells in parallel.
pub const PARALLEL_SPLIT_THRESHOLD: usize = 256;

/// Default capacity of the host generation cache.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Number of modules per side of a QR code of the given version.
///
/// # Example
///
/// ```rust
/// use config::constants::qr_width_for_version;
///
/// assert_eq!(qr_width_for_version(1), 21);
/// assert_eq!(qr_width_for_version(2), 25);
/// ```
#[inline]
pub fn qr_width_for_version(version: u8) -> usize {
    17 + 4 * version as usize
}

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
