//! # Mesh Kernel
//!
//! [`SolidKernel`] implementation over [`RectSolid`].

use qr_solid::{BoxPrimitive, KernelError, SolidKernel};

use crate::ops::{self, UnionOptions};
use crate::solid::RectSolid;

/// Exact rectilinear kernel.
///
/// # Example
///
/// ```rust
/// use qr_solid::{generate, ModuleMatrix, QrOptions};
/// use solid_mesh::MeshKernel;
///
/// let matrix = ModuleMatrix::parse("#.#\n.#.\n#.#").unwrap();
/// let options = QrOptions { size: 3.0, create_base: false, ..QrOptions::default() };
///
/// let solid = generate(&MeshKernel::new(), &matrix, &options).unwrap().into_solid();
/// assert_eq!(solid.lump_count(), 5);
/// assert!((solid.volume() - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshKernel {
    options: UnionOptions,
}

impl MeshKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel splitting operands in parallel above `threshold` cells.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.options.parallel_threshold = threshold;
        self
    }

    /// Kernel rejecting results with more than `max` cells.
    pub fn with_max_cells(mut self, max: usize) -> Self {
        self.options.max_cells = max;
        self
    }
}

impl SolidKernel for MeshKernel {
    type Solid = RectSolid;

    fn create_box(&self, primitive: &BoxPrimitive) -> Result<RectSolid, KernelError> {
        if !primitive.center.is_finite() || !primitive.size.is_finite() {
            return Err(KernelError::Degenerate(format!(
                "non-finite box at {:?} with size {:?}",
                primitive.center, primitive.size
            )));
        }
        if primitive.size.min_element() <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "box size {:?} is not positive",
                primitive.size
            )));
        }
        Ok(RectSolid::cuboid(primitive.bounds())?)
    }

    fn union(&self, a: RectSolid, b: RectSolid) -> Result<RectSolid, KernelError> {
        Ok(ops::union(&a, &b, &self.options)?)
    }
}
