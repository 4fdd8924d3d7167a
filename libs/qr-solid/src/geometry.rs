//! # Geometry
//!
//! Axis-aligned bounds, box primitives and the footprint grid that maps spans
//! to world coordinates.
//!
//! ## Coordinate frame
//!
//! ```text
//!   origin (start_x, start_y)
//!     +----+----+----+ → x (columns grow right)
//!     | r0 |    |    |
//!     +----+----+----+
//!     | r1 |    |    |
//!     +----+----+----+
//!     ↓ -y (rows grow down)
//! ```
//!
//! QR boxes occupy `z ∈ [0, thickness]`; the plate sits below `z = 0`.

use config::constants::GEOMETRY_TOLERANCE;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::span::Span;

// =============================================================================
// AABB
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let e = self.extent().max(DVec3::ZERO);
        e.x * e.y * e.z
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when the boxes share positive volume. Touching faces do not
    /// count as an intersection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        (hi - lo).cmpgt(DVec3::splat(GEOMETRY_TOLERANCE)).all()
    }

    /// Overlapping region, if it has positive volume.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if self.intersects(other) {
            Some(Aabb {
                min: self.min.max(other.min),
                max: self.max.min(other.max),
            })
        } else {
            None
        }
    }

    /// Closed containment test.
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn translated(&self, offset: DVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

// =============================================================================
// BOX PRIMITIVE
// =============================================================================

/// Axis-aligned rectangular prism handed to the kernel.
///
/// `size.x` is the width, `size.y` the depth and `size.z` the height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPrimitive {
    pub center: DVec3,
    pub size: DVec3,
}

impl BoxPrimitive {
    pub fn new(center: DVec3, width: f64, depth: f64, height: f64) -> Self {
        Self {
            center,
            size: DVec3::new(width, depth, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn depth(&self) -> f64 {
        self.size.y
    }

    pub fn height(&self) -> f64 {
        self.size.z
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }
}

// =============================================================================
// GRID LAYOUT
// =============================================================================

/// Footprint frame mapping matrix cells to world coordinates.
///
/// `origin` is the top-left corner of the footprint, `(start_x, start_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub block_size: f64,
    pub thickness: f64,
    pub origin: DVec2,
}

impl GridLayout {
    pub fn new(block_size: f64, thickness: f64, origin: DVec2) -> Self {
        Self {
            block_size,
            thickness,
            origin,
        }
    }

    /// Layout of an `n × n` matrix whose `size × size` footprint is centered
    /// on the world origin.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qr_solid::GridLayout;
    ///
    /// let layout = GridLayout::centered(3.0, 3, 1.0).unwrap();
    /// assert_eq!(layout.block_size, 1.0);
    /// assert_eq!(layout.origin.x, -1.5);
    /// assert_eq!(layout.origin.y, 1.5);
    /// ```
    pub fn centered(size: f64, modules: usize, thickness: f64) -> Result<Self, InputError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(InputError::InvalidFootprintSize(size));
        }
        if modules == 0 {
            return Err(InputError::EmptyMatrix);
        }
        let layout = Self::new(
            size / modules as f64,
            thickness,
            DVec2::new(-size / 2.0, size / 2.0),
        );
        layout.validate()?;
        Ok(layout)
    }

    /// Checks block size and origin. Thickness is left to the kernel, which
    /// reports a degenerate box for the first span.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.block_size.is_finite() && self.block_size > 0.0) {
            return Err(InputError::InvalidBlockSize(self.block_size));
        }
        if !self.origin.is_finite() {
            return Err(InputError::NonFiniteOrigin);
        }
        Ok(())
    }

    /// Side length of the footprint of an `n × n` matrix.
    pub fn footprint_size(&self, modules: usize) -> f64 {
        self.block_size * modules as f64
    }

    /// Center of the footprint of an `n × n` matrix in the xy-plane.
    pub fn footprint_center(&self, modules: usize) -> DVec2 {
        let half = self.footprint_size(modules) / 2.0;
        self.origin + DVec2::new(half, -half)
    }

    /// Box covering exactly the cells of `span`.
    pub fn place(&self, span: &Span) -> BoxPrimitive {
        let run_width = span.length as f64 * self.block_size;
        let center_x = self.origin.x + span.start_col as f64 * self.block_size + run_width / 2.0;
        let center_y = self.origin.y - span.row as f64 * self.block_size - self.block_size / 2.0;

        BoxPrimitive::new(
            DVec3::new(center_x, center_y, self.thickness / 2.0),
            run_width,
            self.block_size,
            self.thickness,
        )
    }

    /// Cell `(row, col)` of an `n × n` matrix containing the point `(x, y)`.
    pub fn cell_at(&self, x: f64, y: f64, modules: usize) -> Option<(usize, usize)> {
        let col = ((x - self.origin.x) / self.block_size).floor();
        let row = ((self.origin.y - y) / self.block_size).floor();
        let n = modules as f64;
        if (0.0..n).contains(&col) && (0.0..n).contains(&row) {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }

    /// Cells of an `n × n` matrix whose centers lie inside the footprint of
    /// `primitive`.
    pub fn covered_cells(&self, primitive: &BoxPrimitive, modules: usize) -> Vec<(usize, usize)> {
        let bounds = primitive.bounds();
        let mut cells = Vec::new();
        for row in 0..modules {
            for col in 0..modules {
                let x = self.origin.x + (col as f64 + 0.5) * self.block_size;
                let y = self.origin.y - (row as f64 + 0.5) * self.block_size;
                if x > bounds.min.x && x < bounds.max.x && y > bounds.min.y && y < bounds.max.y {
                    cells.push((row, col));
                }
            }
        }
        cells
    }
}
