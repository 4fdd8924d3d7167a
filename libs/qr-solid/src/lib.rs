//! # QR Solid
//!
//! Compiles a square QR module matrix into a minimal set of merged solid box
//! primitives, optionally fused with a backing plate, and hands the result to
//! a host scene.
//!
//! ## Architecture
//!
//! ```text
//! ModuleMatrix → span (row run-length) → geometry (box placement)
//!     → accumulator (incremental union) → plate (optional) → Finalized
//!     → scene (translation-only placement) → SceneSink
//! ```
//!
//! The crate never talks to a CAD engine directly. Geometry is produced
//! through the narrow [`SolidKernel`] capability, QR encoding is consumed
//! through [`MatrixSource`], and finished solids leave through
//! [`SceneSink`]. [`BoundsKernel`] is a bounding-box fake kernel for tests
//! and dry runs.
//!
//! ## Usage
//!
//! ```rust
//! use qr_solid::{generate, BoundsKernel, ModuleMatrix, QrOptions};
//!
//! let matrix = ModuleMatrix::parse("#.#\n.#.\n#.#").unwrap();
//! let options = QrOptions { size: 3.0, create_base: false, ..QrOptions::default() };
//!
//! let finalized = generate(&BoundsKernel::new(), &matrix, &options).unwrap();
//! assert_eq!(finalized.report().spans, 5);
//! assert_eq!(finalized.solid().box_count(), 5);
//! ```

pub mod accumulator;
pub mod bounds_kernel;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod matrix;
pub mod pipeline;
pub mod plate;
pub mod scene;
pub mod span;

pub use accumulator::Accumulator;
pub use bounds_kernel::{BoundsKernel, BoundsSolid};
pub use error::{CellRef, ConfigurationError, GenerateError, GeometryError, GeometryStage, InputError};
pub use geometry::{Aabb, BoxPrimitive, GridLayout};
pub use kernel::{
    EncodeRequest, ErrorCorrection, KernelError, MatrixSource, SceneError, SceneSink, SolidKernel,
    SourceError,
};
pub use matrix::ModuleMatrix;
pub use pipeline::{
    compile, compile_with_cancel, generate, generate_from_source, CancelFlag, GenerationReport,
    QrOptions,
};
pub use plate::{compose_plate, plate_box, PlateSpec};
pub use scene::{Assembly, Finalized, Placement, SubAssembly};
pub use span::{compress_matrix, compress_row, row_spans, RowSpans, Span};
