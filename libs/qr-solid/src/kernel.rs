//! # Capabilities
//!
//! The three narrow interfaces the core is built against:
//!
//! - [`MatrixSource`]: an external QR encoder producing the module matrix
//! - [`SolidKernel`]: box creation and boolean union
//! - [`SceneSink`]: the host document receiving finished sub-assemblies
//!
//! Implementations live outside this crate (`solid-mesh`, `qr-encode`,
//! `qr-host`), except for the [`BoundsKernel`](crate::BoundsKernel) fake.

use config::constants::DEFAULT_MIN_VERSION;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::BoxPrimitive;
use crate::scene::SubAssembly;

// =============================================================================
// SOLID KERNEL
// =============================================================================

/// Failure reported by a [`SolidKernel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Zero-size, negative or non-finite dimensions.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// The kernel produced or detected an invalid solid.
    #[error("non-manifold result: {0}")]
    NonManifold(String),

    /// A kernel safety limit was hit.
    #[error("kernel limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("kernel failure: {0}")]
    Other(String),
}

/// Geometry engine used by the accumulator and plate composer.
///
/// `union` consumes both operands; the accumulator never needs them again.
/// Implementations must be deterministic for identical inputs.
pub trait SolidKernel {
    /// Opaque solid handle. May represent several disjoint shells.
    type Solid: Clone;

    /// Creates an axis-aligned box.
    fn create_box(&self, primitive: &BoxPrimitive) -> Result<Self::Solid, KernelError>;

    /// Boolean union of two solids.
    fn union(&self, a: Self::Solid, b: Self::Solid) -> Result<Self::Solid, KernelError>;
}

// =============================================================================
// MATRIX SOURCE
// =============================================================================

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// ~7% recovery.
    Low,
    /// ~15% recovery.
    #[default]
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery.
    High,
}

/// Parameters passed to a [`MatrixSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRequest<'a> {
    pub data: &'a str,
    pub error_correction: ErrorCorrection,
    /// Smallest acceptable QR version; larger versions are used when the data
    /// does not fit.
    pub min_version: u8,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            data,
            error_correction: ErrorCorrection::default(),
            min_version: DEFAULT_MIN_VERSION,
        }
    }

    pub fn with_error_correction(mut self, level: ErrorCorrection) -> Self {
        self.error_correction = level;
        self
    }

    pub fn with_min_version(mut self, version: u8) -> Self {
        self.min_version = version;
        self
    }
}

/// Failure reported by a [`MatrixSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{len} bytes of data do not fit in any QR version from {min_version} to 40")]
    DataTooLong { len: usize, min_version: u8 },

    #[error("QR version must be between 1 and 40, got {0}")]
    InvalidVersion(u8),

    #[error("encoder failure: {0}")]
    Encoder(String),
}

/// External QR encoder. Returns an N×N matrix with row 0 at the top and
/// `true` for dark modules.
pub trait MatrixSource {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<Vec<Vec<bool>>, SourceError>;
}

// =============================================================================
// SCENE SINK
// =============================================================================

/// Failure reported by a [`SceneSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("a component named '{0}' already exists")]
    DuplicateName(String),

    #[error("scene rejected the component: {0}")]
    Rejected(String),
}

/// Host document that takes ownership of finished solids.
pub trait SceneSink {
    type Solid;
    type Handle;

    fn place(&mut self, assembly: SubAssembly<Self::Solid>) -> Result<Self::Handle, SceneError>;
}
