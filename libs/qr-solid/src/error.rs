//! # Generation Errors
//!
//! Typed failures of a generation request. Every variant is fatal for the
//! request that produced it: no partial solid is ever returned alongside an
//! error.

use std::fmt;

use thiserror::Error;

use crate::kernel::{KernelError, SourceError};

/// Matrix cell (row, column) that produced a geometry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.col)
    }
}

/// Rejected input, detected before any geometry work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("module matrix is empty")]
    EmptyMatrix,

    #[error("module matrix row {row} is empty")]
    EmptyRow { row: usize },

    #[error("module matrix is not square: row {row} has {found} modules, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("footprint size must be positive and finite, got {0}")]
    InvalidFootprintSize(f64),

    #[error("block size must be positive and finite, got {0}")]
    InvalidBlockSize(f64),

    #[error("footprint origin must be finite")]
    NonFiniteOrigin,

    #[error("matrix has no filled modules and no plate was requested")]
    NothingToGenerate,

    #[error("module matrix is {size}x{size}, the limit is {max}x{max}")]
    TooManyModules { size: usize, max: usize },

    #[error("unrecognized module '{found}' at row {row}, column {col}")]
    UnrecognizedCell { row: usize, col: usize, found: char },
}

/// Rejected plate parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("plate thickness must be positive and finite, got {0}")]
    NonPositivePlateThickness(f64),

    #[error("plate margin must be non-negative and finite, got {0}")]
    NegativeMargin(f64),
}

/// Pipeline step at which the kernel failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryStage {
    /// Creating the box of one span.
    CreateBox,
    /// Merging a span box into the accumulated solid.
    Union,
    /// Creating the plate or merging it with the QR solid.
    Plate,
    /// Using an accumulator that already failed.
    Poisoned,
}

impl fmt::Display for GeometryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateBox => "box creation",
            Self::Union => "union",
            Self::Plate => "plate composition",
            Self::Poisoned => "accumulation",
        };
        f.write_str(name)
    }
}

/// Kernel failure, tagged with the stage and the module that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed{}: {source}", .cell.map(|c| format!(" at {c}")).unwrap_or_default())]
pub struct GeometryError {
    pub stage: GeometryStage,
    pub cell: Option<CellRef>,
    #[source]
    pub source: KernelError,
}

impl GeometryError {
    pub fn new(stage: GeometryStage, cell: Option<CellRef>, source: KernelError) -> Self {
        Self {
            stage,
            cell,
            source,
        }
    }

    /// Error returned by an accumulator that is already in the failed state.
    pub fn poisoned(cell: Option<CellRef>) -> Self {
        Self::new(
            GeometryStage::Poisoned,
            cell,
            KernelError::Other("accumulator already failed".to_string()),
        )
    }
}

/// Any failure of a generation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("matrix source failed: {0}")]
    Source(#[from] SourceError),

    #[error("generation cancelled before row {row}")]
    Cancelled { row: usize },
}

impl GenerateError {
    /// Matrix cell responsible for a geometry failure, if known.
    pub fn cell(&self) -> Option<CellRef> {
        match self {
            Self::Geometry(err) => err.cell,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_names_cell() {
        let err = GeometryError::new(
            GeometryStage::Union,
            Some(CellRef::new(3, 7)),
            KernelError::NonManifold("open edge".into()),
        );
        let text = err.to_string();
        assert!(text.contains("union failed at row 3, column 7"), "{text}");
        assert!(text.contains("open edge"));
    }

    #[test]
    fn test_geometry_error_without_cell() {
        let err = GeometryError::new(
            GeometryStage::Plate,
            None,
            KernelError::Degenerate("zero thickness".into()),
        );
        assert!(err.to_string().starts_with("plate composition failed: "));
    }

    #[test]
    fn test_generate_error_cell() {
        let err: GenerateError = GeometryError::poisoned(Some(CellRef::new(1, 2))).into();
        assert_eq!(err.cell(), Some(CellRef::new(1, 2)));
        assert_eq!(GenerateError::from(InputError::EmptyMatrix).cell(), None);
    }
}
