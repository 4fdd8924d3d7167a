//! # Rectilinear Solid
//!
//! A solid made of interior-disjoint axis-aligned cells. Any union of boxes
//! is represented exactly, including disconnected islands.

use config::constants::GEOMETRY_TOLERANCE;
use glam::DVec3;
use qr_solid::Aabb;

use crate::error::MeshError;
use crate::ops::{self, UnionOptions};

/// Non-empty set of interior-disjoint cells.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use qr_solid::Aabb;
/// use solid_mesh::RectSolid;
///
/// let a = RectSolid::cuboid(Aabb::new(DVec3::ZERO, DVec3::ONE)).unwrap();
/// let b = a.translated(DVec3::X);
/// let u = a.union(&b).unwrap();
/// assert_eq!(u.volume(), 2.0);
/// assert_eq!(u.lump_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RectSolid {
    cells: Vec<Aabb>,
}

impl RectSolid {
    /// Single-cell solid. Rejects non-finite bounds and extents at or below
    /// the geometry tolerance.
    pub fn cuboid(bounds: Aabb) -> Result<Self, MeshError> {
        let extent = bounds.extent();
        if !bounds.is_finite() {
            return Err(MeshError::degenerate(format!(
                "non-finite box {:?}..{:?}",
                bounds.min, bounds.max
            )));
        }
        if extent.min_element() <= GEOMETRY_TOLERANCE {
            return Err(MeshError::degenerate(format!(
                "box extent {:?} is not positive",
                extent
            )));
        }
        Ok(Self {
            cells: vec![bounds],
        })
    }

    /// Wraps cells already known to be non-empty and interior-disjoint.
    pub(crate) fn from_cells_unchecked(cells: Vec<Aabb>) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells }
    }

    pub fn cells(&self) -> &[Aabb] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Exact volume (cells never overlap).
    pub fn volume(&self) -> f64 {
        self.cells.iter().map(Aabb::volume).sum()
    }

    pub fn bounds(&self) -> Aabb {
        let first = self.cells[0];
        self.cells.iter().skip(1).fold(first, |acc, c| acc.union(c))
    }

    /// Closed containment test.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.cells.iter().any(|c| c.contains_point(point))
    }

    pub fn translated(&self, offset: DVec3) -> RectSolid {
        RectSolid {
            cells: self.cells.iter().map(|c| c.translated(offset)).collect(),
        }
    }

    /// Union with default limits.
    pub fn union(&self, other: &RectSolid) -> Result<RectSolid, MeshError> {
        ops::union(self, other, &UnionOptions::default())
    }

    /// Number of face-connected components.
    ///
    /// Cells touching only along an edge or at a corner are separate lumps.
    pub fn lump_count(&self) -> usize {
        let n = self.cells.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| self.cells[i].min.x.total_cmp(&self.cells[j].min.x));

        let mut parent: Vec<usize> = (0..n).collect();
        let mut lumps = n;

        for (k, &i) in order.iter().enumerate() {
            let a = &self.cells[i];
            for &j in &order[k + 1..] {
                let b = &self.cells[j];
                if b.min.x > a.max.x + GEOMETRY_TOLERANCE {
                    break;
                }
                if share_face(a, b) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    if ri != rj {
                        parent[ri] = rj;
                        lumps -= 1;
                    }
                }
            }
        }
        lumps
    }
}

/// True when the cells touch across a face of positive area.
fn share_face(a: &Aabb, b: &Aabb) -> bool {
    let lo = a.min.max(b.min);
    let hi = a.max.min(b.max);
    let overlap = hi - lo;

    let touching = (0..3)
        .filter(|&k| overlap[k].abs() <= GEOMETRY_TOLERANCE)
        .count();
    let spanning = (0..3).filter(|&k| overlap[k] > GEOMETRY_TOLERANCE).count();
    touching == 1 && spanning == 2
}

pub(crate) fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}
