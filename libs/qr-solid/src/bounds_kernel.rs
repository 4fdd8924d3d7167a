//! # Bounds Kernel
//!
//! Bounding-box fake of [`SolidKernel`]. Solids are plain lists of boxes;
//! union concatenates them. Used for unit tests and dry runs where no real
//! geometry engine is available.
//!
//! Failure injection: [`BoundsKernel::failing_on_union`] makes the k-th union
//! call fail with [`KernelError::NonManifold`].

use std::cell::Cell;

use config::constants::GEOMETRY_TOLERANCE;
use glam::DVec3;

use crate::geometry::{Aabb, BoxPrimitive};
use crate::kernel::{KernelError, SolidKernel};

/// Solid of the fake kernel: every box merged into it, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsSolid {
    boxes: Vec<Aabb>,
}

impl BoundsSolid {
    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Bounding volume of all boxes.
    pub fn bounds(&self) -> Aabb {
        let first = self.boxes[0];
        self.boxes.iter().skip(1).fold(first, |acc, b| acc.union(b))
    }

    /// True when any box contains the point.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.boxes.iter().any(|b| b.contains_point(point))
    }

    /// Sum of box volumes. Overlaps are counted twice.
    pub fn total_volume(&self) -> f64 {
        self.boxes.iter().map(Aabb::volume).sum()
    }
}

/// Fake kernel with counters and optional failure injection.
#[derive(Debug, Default)]
pub struct BoundsKernel {
    fail_on_union: Option<usize>,
    unions: Cell<usize>,
    boxes: Cell<usize>,
}

impl BoundsKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel whose `k`-th union call (1-based) fails.
    pub fn failing_on_union(k: usize) -> Self {
        Self {
            fail_on_union: Some(k),
            ..Self::default()
        }
    }

    /// Number of union calls so far, including a failed one.
    pub fn union_count(&self) -> usize {
        self.unions.get()
    }

    /// Number of boxes created so far.
    pub fn box_count(&self) -> usize {
        self.boxes.get()
    }
}

impl SolidKernel for BoundsKernel {
    type Solid = BoundsSolid;

    fn create_box(&self, primitive: &BoxPrimitive) -> Result<BoundsSolid, KernelError> {
        let size = primitive.size;
        if !(size.is_finite() && primitive.center.is_finite()) {
            return Err(KernelError::Degenerate(format!(
                "non-finite box at {:?} with size {:?}",
                primitive.center, size
            )));
        }
        if size.min_element() <= GEOMETRY_TOLERANCE {
            return Err(KernelError::Degenerate(format!(
                "box size {:?} has a non-positive extent",
                size
            )));
        }

        self.boxes.set(self.boxes.get() + 1);
        Ok(BoundsSolid {
            boxes: vec![primitive.bounds()],
        })
    }

    fn union(&self, a: BoundsSolid, b: BoundsSolid) -> Result<BoundsSolid, KernelError> {
        let call = self.unions.get() + 1;
        self.unions.set(call);
        if self.fail_on_union == Some(call) {
            return Err(KernelError::NonManifold(format!(
                "injected failure on union #{call}"
            )));
        }

        let mut boxes = a.boxes;
        boxes.extend(b.boxes);
        Ok(BoundsSolid { boxes })
    }
}
