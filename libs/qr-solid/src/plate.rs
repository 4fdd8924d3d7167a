//! # Plate Composer
//!
//! Builds the optional backing plate under the QR footprint and merges it
//! with the accumulated QR solid.
//!
//! The plate is a square of side `footprint + 2 × margin`, centered under the
//! footprint, with its top face at `z = 0` and its bottom at
//! `z = -thickness`.

use glam::DVec3;

use crate::error::{ConfigurationError, GeometryError, GeometryStage};
use crate::geometry::{BoxPrimitive, GridLayout};
use crate::kernel::SolidKernel;

/// Validated plate parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateSpec {
    margin: f64,
    thickness: f64,
}

impl PlateSpec {
    /// # Example
    ///
    /// ```rust
    /// use qr_solid::{ConfigurationError, PlateSpec};
    ///
    /// assert!(PlateSpec::new(2.0, 2.0).is_ok());
    /// assert_eq!(
    ///     PlateSpec::new(-1.0, 2.0),
    ///     Err(ConfigurationError::NegativeMargin(-1.0))
    /// );
    /// ```
    pub fn new(margin: f64, thickness: f64) -> Result<Self, ConfigurationError> {
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(ConfigurationError::NonPositivePlateThickness(thickness));
        }
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(ConfigurationError::NegativeMargin(margin));
        }
        Ok(Self { margin, thickness })
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Plate side length for a footprint of the given size.
    pub fn width(&self, footprint_size: f64) -> f64 {
        footprint_size + 2.0 * self.margin
    }
}

/// Plate box under the footprint of an `n × n` matrix.
pub fn plate_box(layout: &GridLayout, modules: usize, spec: &PlateSpec) -> BoxPrimitive {
    let width = spec.width(layout.footprint_size(modules));
    let center = layout.footprint_center(modules);

    BoxPrimitive::new(
        DVec3::new(center.x, center.y, -spec.thickness / 2.0),
        width,
        width,
        spec.thickness,
    )
}

/// Creates the plate and merges it with the QR solid, if there is one.
pub fn compose_plate<K: SolidKernel>(
    kernel: &K,
    qr: Option<K::Solid>,
    plate: &BoxPrimitive,
) -> Result<K::Solid, GeometryError> {
    let plate_solid = kernel
        .create_box(plate)
        .map_err(|source| GeometryError::new(GeometryStage::Plate, None, source))?;

    match qr {
        None => Ok(plate_solid),
        Some(solid) => kernel
            .union(solid, plate_solid)
            .map_err(|source| GeometryError::new(GeometryStage::Plate, None, source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds_kernel::BoundsKernel;
    use approx::assert_relative_eq;
    use glam::DVec2;

    #[test]
    fn test_plate_box_for_centered_footprint() {
        let layout = GridLayout::centered(10.0, 5, 1.0).unwrap();
        let spec = PlateSpec::new(2.0, 3.0).unwrap();
        let plate = plate_box(&layout, 5, &spec);

        assert_relative_eq!(plate.width(), 14.0);
        assert_relative_eq!(plate.depth(), 14.0);
        assert_relative_eq!(plate.height(), 3.0);
        assert_relative_eq!(plate.center.x, 0.0);
        assert_relative_eq!(plate.center.y, 0.0);
        assert_relative_eq!(plate.bounds().max.z, 0.0);
        assert_relative_eq!(plate.bounds().min.z, -3.0);
    }

    #[test]
    fn test_plate_follows_offset_footprint() {
        let layout = GridLayout::new(1.0, 1.0, DVec2::new(0.0, 4.0));
        let spec = PlateSpec::new(0.0, 1.0).unwrap();
        let plate = plate_box(&layout, 4, &spec);
        assert_relative_eq!(plate.center.x, 2.0);
        assert_relative_eq!(plate.center.y, 2.0);
        assert_relative_eq!(plate.width(), 4.0);
    }

    #[test]
    fn test_plate_spec_validation() {
        assert_eq!(
            PlateSpec::new(1.0, 0.0),
            Err(ConfigurationError::NonPositivePlateThickness(0.0))
        );
        assert!(PlateSpec::new(1.0, f64::NAN).is_err());
        assert!(PlateSpec::new(f64::INFINITY, 1.0).is_err());
        assert!(PlateSpec::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_compose_plate_alone() {
        let kernel = BoundsKernel::new();
        let layout = GridLayout::centered(2.0, 2, 1.0).unwrap();
        let plate = plate_box(&layout, 2, &PlateSpec::new(1.0, 1.0).unwrap());
        let solid = compose_plate(&kernel, None, &plate).unwrap();
        assert_eq!(solid.box_count(), 1);
        assert_eq!(kernel.union_count(), 0);
    }

    #[test]
    fn test_compose_plate_failure_is_tagged() {
        let kernel = BoundsKernel::failing_on_union(1);
        let layout = GridLayout::centered(2.0, 2, 1.0).unwrap();
        let qr = kernel.create_box(&layout.place(&crate::span::Span {
            row: 0,
            start_col: 0,
            length: 1,
        }));
        let plate = plate_box(&layout, 2, &PlateSpec::new(1.0, 1.0).unwrap());

        let err = compose_plate(&kernel, qr.ok(), &plate).unwrap_err();
        assert_eq!(err.stage, GeometryStage::Plate);
        assert_eq!(err.cell, None);
    }
}
