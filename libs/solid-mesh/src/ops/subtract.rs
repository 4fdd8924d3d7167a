//! # Box Subtraction
//!
//! `a \ b` for two axis-aligned boxes, as at most six disjoint boxes.
//!
//! ```text
//!   +-----------------+
//!   |      y-high     |
//!   +----+-----+------+
//!   | x- |  b  |  x+  |     (z slabs split the middle column)
//!   +----+-----+------+
//!   |      y-low      |
//!   +-----------------+
//! ```
//!
//! The x slabs take the full y/z extent of `a`, the y slabs the middle x
//! range, the z slabs the middle x/y range.

use config::constants::GEOMETRY_TOLERANCE;
use qr_solid::Aabb;

/// Pieces of `a` outside `b`. Returns `a` unchanged when they do not share
/// volume. Pieces thinner than the geometry tolerance are dropped.
pub fn subtract_box(a: &Aabb, b: &Aabb) -> Vec<Aabb> {
    if !a.intersects(b) {
        return vec![*a];
    }

    let mut pieces = Vec::with_capacity(6);
    let mut rest = *a;

    for axis in 0..3 {
        let lo = b.min[axis].max(rest.min[axis]);
        let hi = b.max[axis].min(rest.max[axis]);

        if lo - rest.min[axis] > GEOMETRY_TOLERANCE {
            let mut piece = rest;
            piece.max[axis] = lo;
            pieces.push(piece);
        }
        if rest.max[axis] - hi > GEOMETRY_TOLERANCE {
            let mut piece = rest;
            piece.min[axis] = hi;
            pieces.push(piece);
        }

        rest.min[axis] = lo;
        rest.max[axis] = hi;
    }

    pieces
}
