//! # Mesh Errors
//!
//! Error types for solid construction, boolean operations and export.

use qr_solid::KernelError;
use thiserror::Error;

/// Errors that can occur in the rectilinear kernel.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Zero, negative or non-finite extents
    #[error("Degenerate geometry: {message}")]
    Degenerate { message: String },

    /// A boolean result failed validation
    #[error("Invalid result: {message}")]
    InvalidResult { message: String },

    /// Too many cells in one solid
    #[error("Too many cells: {count} (max: {max})")]
    TooManyCells { count: usize, max: usize },

    /// Too many triangles in one mesh
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },

    /// Writing an export failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }

    /// Creates an invalid result error.
    pub fn invalid_result(message: impl Into<String>) -> Self {
        Self::InvalidResult {
            message: message.into(),
        }
    }
}

impl From<MeshError> for KernelError {
    fn from(err: MeshError) -> Self {
        let message = err.to_string();
        match err {
            MeshError::Degenerate { .. } => KernelError::Degenerate(message),
            MeshError::InvalidResult { .. } => KernelError::NonManifold(message),
            MeshError::TooManyCells { .. } | MeshError::TooManyTriangles { .. } => {
                KernelError::LimitExceeded(message)
            }
            MeshError::Io(_) => KernelError::Other(message),
        }
    }
}
