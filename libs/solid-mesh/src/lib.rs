//! # Solid Mesh
//!
//! Exact rectilinear solid kernel for the QR solid pipeline.
//!
//! ## Architecture
//!
//! ```text
//! BoxPrimitive → RectSolid (disjoint cells) → ops::union → RectSolid
//!                                                  ↓
//!                                   to_mesh → Mesh → STL / MeshBuffers
//! ```
//!
//! Solids are sets of interior-disjoint axis-aligned cells, so unions of
//! boxes are exact and volumes are sums of cell volumes. Meshes are only
//! built for export.

pub mod error;
pub mod export;
mod extract;
pub mod kernel;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod solid;

pub use error::MeshError;
pub use export::{write_stl_ascii, write_stl_binary, MeshBuffers};
pub use kernel::MeshKernel;
pub use mesh::Mesh;
pub use solid::RectSolid;
