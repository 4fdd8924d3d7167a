//! # Icon Glyph
//!
//! Rasterizes the camera-style social icon into a module matrix so it can be
//! built by the same span pipeline as a QR code.
//!
//! The glyph lives in a unit square centered on the origin, y up:
//!
//! ```text
//! rounded square (corner radius 0.25)
//!   minus lens circle (radius 0.25, centered)
//!   minus dot (radius 0.05, at (0.35, 0.35))
//! ```

use config::constants::{
    ICON_CORNER_RADIUS_RATIO, ICON_DOT_OFFSET_RATIO, ICON_DOT_RADIUS_RATIO, ICON_LENS_RADIUS_RATIO,
};
use qr_solid::{InputError, ModuleMatrix};

/// True when the unit-square point `(u, v)` is part of the glyph.
pub fn glyph_contains(u: f64, v: f64) -> bool {
    let r = ICON_CORNER_RADIUS_RATIO;
    let dx = (u.abs() - (0.5 - r)).max(0.0);
    let dy = (v.abs() - (0.5 - r)).max(0.0);
    if u.abs() > 0.5 || v.abs() > 0.5 || dx * dx + dy * dy > r * r {
        return false;
    }

    let lens = ICON_LENS_RADIUS_RATIO;
    if u * u + v * v < lens * lens {
        return false;
    }

    let (du, dv) = (u - ICON_DOT_OFFSET_RATIO, v - ICON_DOT_OFFSET_RATIO);
    let dot = ICON_DOT_RADIUS_RATIO;
    du * du + dv * dv >= dot * dot
}

/// `resolution × resolution` matrix sampled at cell centers, row 0 at the
/// top.
pub fn icon_matrix(resolution: usize) -> Result<ModuleMatrix, InputError> {
    let n = resolution as f64;
    let rows = (0..resolution)
        .map(|row| {
            let v = 0.5 - (row as f64 + 0.5) / n;
            (0..resolution)
                .map(|col| glyph_contains((col as f64 + 0.5) / n - 0.5, v))
                .collect()
        })
        .collect();
    ModuleMatrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::constants::ICON_RESOLUTION;

    #[test]
    fn test_icon_matrix_shape() {
        let matrix = icon_matrix(ICON_RESOLUTION).unwrap();
        assert_eq!(matrix.size(), ICON_RESOLUTION);

        // rounded corners are cut away
        assert!(!matrix.is_filled(0, 0));
        assert!(!matrix.is_filled(39, 39));
        // edge midpoints belong to the frame
        assert!(matrix.is_filled(0, 20));
        assert!(matrix.is_filled(20, 0));
        // lens hole
        assert!(!matrix.is_filled(20, 20));
        // dot sits top-right
        assert!(!matrix.is_filled(5, 33));
        assert!(matrix.is_filled(34, 5));
    }

    #[test]
    fn test_icon_is_symmetric_apart_from_dot() {
        let matrix = icon_matrix(ICON_RESOLUTION).unwrap();
        let n = matrix.size();
        let mut mismatches = 0;
        for r in 0..n {
            for c in 0..n {
                if matrix.is_filled(r, c) != matrix.is_filled(n - 1 - r, n - 1 - c) {
                    mismatches += 1;
                }
            }
        }
        // only the dot cells differ from their mirror image
        assert!(mismatches > 0);
        assert!(mismatches <= 2 * 16);
    }

    #[test]
    fn test_zero_resolution_is_empty() {
        assert_eq!(icon_matrix(0), Err(InputError::EmptyMatrix));
    }
}
