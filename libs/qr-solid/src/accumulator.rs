//! # Solid Accumulator
//!
//! Owns the one evolving solid of a generation request and merges box
//! primitives into it through the kernel.
//!
//! ```text
//!   Empty ──add──▶ HasGeometry ──add──▶ HasGeometry
//!     │                 │
//!     └──── failure ────┴──▶ Failed (terminal)
//! ```
//!
//! A failed accumulator never yields a partial solid.

use tracing::warn;

use crate::error::{CellRef, GeometryError, GeometryStage};
use crate::geometry::BoxPrimitive;
use crate::kernel::{KernelError, SolidKernel};

enum State<S> {
    Empty,
    HasGeometry(S),
    Failed,
}

/// Incremental union of box primitives.
pub struct Accumulator<'k, K: SolidKernel> {
    kernel: &'k K,
    state: State<K::Solid>,
    boxes: usize,
}

impl<'k, K: SolidKernel> Accumulator<'k, K> {
    pub fn new(kernel: &'k K) -> Self {
        Self {
            kernel,
            state: State::Empty,
            boxes: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    pub fn has_geometry(&self) -> bool {
        matches!(self.state, State::HasGeometry(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }

    /// Number of boxes merged so far.
    pub fn box_count(&self) -> usize {
        self.boxes
    }

    /// Merges one box. `cell` is the matrix cell the box starts at and is
    /// attached to any failure.
    ///
    /// The state is `Failed` while the kernel runs, so an error at any step
    /// leaves the accumulator poisoned.
    pub fn add(&mut self, primitive: &BoxPrimitive, cell: CellRef) -> Result<(), GeometryError> {
        let merged = match std::mem::replace(&mut self.state, State::Failed) {
            State::Failed => return Err(GeometryError::poisoned(Some(cell))),
            State::Empty => self.create(primitive, cell)?,
            State::HasGeometry(existing) => {
                let solid = self.create(primitive, cell)?;
                self.kernel
                    .union(existing, solid)
                    .map_err(|source| fail(GeometryStage::Union, cell, source))?
            }
        };

        self.state = State::HasGeometry(merged);
        self.boxes += 1;
        Ok(())
    }

    /// Consumes the accumulator. `None` when no box was ever added.
    pub fn into_solid(self) -> Result<Option<K::Solid>, GeometryError> {
        match self.state {
            State::Empty => Ok(None),
            State::HasGeometry(solid) => Ok(Some(solid)),
            State::Failed => Err(GeometryError::poisoned(None)),
        }
    }

    fn create(&self, primitive: &BoxPrimitive, cell: CellRef) -> Result<K::Solid, GeometryError> {
        self.kernel
            .create_box(primitive)
            .map_err(|source| fail(GeometryStage::CreateBox, cell, source))
    }
}

fn fail(stage: GeometryStage, cell: CellRef, source: KernelError) -> GeometryError {
    warn!(row = cell.row, col = cell.col, %stage, error = %source, "accumulator failed");
    GeometryError::new(stage, Some(cell), source)
}
