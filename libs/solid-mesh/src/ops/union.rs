//! # Union
//!
//! `a ∪ b` keeps every cell of `a` and appends the parts of `b`'s cells
//! outside `a`. Cells stay interior-disjoint, so volume is exact.
//!
//! Large operands are split with rayon: candidate cells of `a` are filtered
//! in parallel, and `b`'s cells are split against them in parallel. Results
//! are collected in order, so output is deterministic.

use config::constants::{GEOMETRY_TOLERANCE, MAX_SOLID_CELLS, PARALLEL_SPLIT_THRESHOLD};
use qr_solid::Aabb;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::subtract::subtract_box;
use crate::error::MeshError;
use crate::solid::RectSolid;

/// Tuning knobs of [`union`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionOptions {
    /// Operand cell count above which work is split across threads.
    pub parallel_threshold: usize,
    /// Largest cell count a result may have.
    pub max_cells: usize,
}

impl Default for UnionOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: PARALLEL_SPLIT_THRESHOLD,
            max_cells: MAX_SOLID_CELLS,
        }
    }
}

/// Union of two solids, validated before it is returned.
pub fn union(a: &RectSolid, b: &RectSolid, options: &UnionOptions) -> Result<RectSolid, MeshError> {
    let a_bounds = a.bounds();
    let b_bounds = b.bounds();

    let mut cells = a.cells().to_vec();
    if !a_bounds.intersects(&b_bounds) {
        cells.extend_from_slice(b.cells());
    } else {
        let candidates = overlapping(a.cells(), &b_bounds, options.parallel_threshold);
        let split = |cell: &Aabb| split_cell(cell, &candidates);

        let fragments: Vec<Vec<Aabb>> = if b.cell_count() > options.parallel_threshold {
            b.cells().par_iter().map(split).collect()
        } else {
            b.cells().iter().map(split).collect()
        };
        cells.extend(fragments.into_iter().flatten());
    }

    if cells.len() > options.max_cells {
        warn!(count = cells.len(), max = options.max_cells, "union exceeded cell limit");
        return Err(MeshError::TooManyCells {
            count: cells.len(),
            max: options.max_cells,
        });
    }

    let result = RectSolid::from_cells_unchecked(cells);
    validate(&result, a.volume(), b.volume())?;

    debug!(
        a = a.cell_count(),
        b = b.cell_count(),
        result = result.cell_count(),
        "union"
    );
    Ok(result)
}

/// Cells of `cells` sharing volume with `region`.
fn overlapping(cells: &[Aabb], region: &Aabb, parallel_threshold: usize) -> Vec<Aabb> {
    if cells.len() > parallel_threshold {
        cells
            .par_iter()
            .filter(|c| c.intersects(region))
            .copied()
            .collect()
    } else {
        cells.iter().filter(|c| c.intersects(region)).copied().collect()
    }
}

/// Parts of `cell` outside every cell of `cutters`.
fn split_cell(cell: &Aabb, cutters: &[Aabb]) -> Vec<Aabb> {
    let mut fragments = vec![*cell];
    for cutter in cutters.iter().filter(|c| c.intersects(cell)) {
        fragments = fragments
            .iter()
            .flat_map(|fragment| subtract_box(fragment, cutter))
            .collect();
        if fragments.is_empty() {
            break;
        }
    }
    fragments
}

fn validate(result: &RectSolid, va: f64, vb: f64) -> Result<(), MeshError> {
    if let Some(cell) = result
        .cells()
        .iter()
        .find(|c| !c.is_finite() || c.extent().min_element() <= GEOMETRY_TOLERANCE)
    {
        warn!(?cell, "union produced a degenerate cell");
        return Err(MeshError::invalid_result(format!(
            "degenerate cell {:?}..{:?}",
            cell.min, cell.max
        )));
    }

    let volume = result.volume();
    let slack = GEOMETRY_TOLERANCE * (va + vb).max(1.0) * result.cell_count().max(1) as f64;
    if volume < va.max(vb) - slack || volume > va + vb + slack {
        warn!(volume, va, vb, "union volume out of range");
        return Err(MeshError::invalid_result(format!(
            "union volume {volume} outside [{}, {}]",
            va.max(vb),
            va + vb
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn cube(min: [f64; 3], size: f64) -> RectSolid {
        let min = DVec3::from(min);
        RectSolid::cuboid(Aabb::new(min, min + DVec3::splat(size))).unwrap()
    }

    #[test]
    fn test_disjoint_union_keeps_both() {
        let a = cube([0.0; 3], 1.0);
        let b = cube([5.0, 0.0, 0.0], 1.0);
        let u = union(&a, &b, &UnionOptions::default()).unwrap();
        assert_eq!(u.cell_count(), 2);
        assert_relative_eq!(u.volume(), 2.0);
    }

    #[test]
    fn test_overlap_counted_once() {
        let a = cube([0.0; 3], 2.0);
        let b = cube([1.0; 3], 2.0);
        let u = union(&a, &b, &UnionOptions::default()).unwrap();
        assert_relative_eq!(u.volume(), 8.0 + 8.0 - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contained_operand_adds_nothing() {
        let a = cube([0.0; 3], 4.0);
        let b = cube([1.0; 3], 1.0);
        let u = union(&a, &b, &UnionOptions::default()).unwrap();
        assert_eq!(u.cell_count(), 1);
        assert_relative_eq!(u.volume(), 64.0);
    }

    #[test]
    fn test_parallel_split_matches_sequential() {
        let mut a = cube([0.0; 3], 1.0);
        let mut b = cube([0.5, 0.5, 0.0], 1.0);
        for i in 1..8 {
            let x = i as f64 * 2.0;
            a = union(&a, &cube([x, 0.0, 0.0], 1.0), &UnionOptions::default()).unwrap();
            b = union(&b, &cube([x + 0.5, 0.5, 0.0], 1.0), &UnionOptions::default()).unwrap();
        }

        let sequential = union(&a, &b, &UnionOptions::default()).unwrap();
        let parallel = union(
            &a,
            &b,
            &UnionOptions {
                parallel_threshold: 1,
                ..UnionOptions::default()
            },
        )
        .unwrap();

        assert_eq!(sequential.cells(), parallel.cells());
        assert_relative_eq!(sequential.volume(), 8.0 * 1.75, epsilon = 1e-9);
    }

    #[test]
    fn test_cell_limit() {
        let a = cube([0.0; 3], 1.0);
        let b = cube([2.0, 0.0, 0.0], 1.0);
        let err = union(
            &a,
            &b,
            &UnionOptions {
                max_cells: 1,
                ..UnionOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::TooManyCells { count: 2, max: 1 }));
    }
}
