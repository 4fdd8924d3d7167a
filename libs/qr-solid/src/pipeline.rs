//! # Generation Pipeline
//!
//! Entry points tying the stages together:
//!
//! - [`compile`] / [`compile_with_cancel`]: explicit layout and plate
//! - [`generate`]: footprint size and plate taken from [`QrOptions`]
//! - [`generate_from_source`]: encodes text through a [`MatrixSource`] first
//!
//! All validation happens before the first kernel call. Rows are processed
//! strictly in order on the calling thread.

use std::sync::atomic::{AtomicBool, Ordering};

use config::constants::{
    DEFAULT_BASE_MARGIN, DEFAULT_BASE_THICKNESS, DEFAULT_CREATE_BASE, DEFAULT_QR_SIZE,
    DEFAULT_QR_THICKNESS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::accumulator::Accumulator;
use crate::error::{CellRef, ConfigurationError, GenerateError, InputError};
use crate::geometry::GridLayout;
use crate::kernel::{EncodeRequest, MatrixSource, SolidKernel};
use crate::matrix::ModuleMatrix;
use crate::plate::{compose_plate, plate_box, PlateSpec};
use crate::scene::Finalized;
use crate::span::row_spans;

// =============================================================================
// OPTIONS
// =============================================================================

/// Recognized generation parameters.
///
/// Missing fields take the defaults from `config::constants` when
/// deserialized.
///
/// # Example
///
/// ```rust
/// use qr_solid::QrOptions;
///
/// let options: QrOptions = serde_json::from_str(r#"{"size": 40.0}"#).unwrap();
/// assert_eq!(options.size, 40.0);
/// assert!(options.create_base);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Side length of the QR footprint.
    pub size: f64,
    /// Extrusion height of every QR box.
    pub thickness: f64,
    /// Whether the backing plate is built.
    pub create_base: bool,
    /// Plate overhang beyond the footprint.
    pub margin: f64,
    /// Plate z-extent.
    pub base_thickness: f64,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_QR_SIZE,
            thickness: DEFAULT_QR_THICKNESS,
            create_base: DEFAULT_CREATE_BASE,
            margin: DEFAULT_BASE_MARGIN,
            base_thickness: DEFAULT_BASE_THICKNESS,
        }
    }
}

impl QrOptions {
    /// Plate parameters, or `None` when no plate is requested.
    pub fn plate(&self) -> Result<Option<PlateSpec>, ConfigurationError> {
        if !self.create_base {
            return Ok(None);
        }
        PlateSpec::new(self.margin, self.base_thickness).map(Some)
    }

    /// Centered layout for an `n × n` matrix.
    pub fn layout(&self, modules: usize) -> Result<GridLayout, InputError> {
        GridLayout::centered(self.size, modules, self.thickness)
    }

    /// Checks everything that does not depend on the matrix.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(InputError::InvalidFootprintSize(self.size).into());
        }
        self.plate()?;
        Ok(())
    }
}

// =============================================================================
// CANCELLATION & REPORT
// =============================================================================

/// Cooperative cancellation flag, polled before each row.
///
/// Share it across threads with `Arc<CancelFlag>`.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts produced alongside a finalized solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GenerationReport {
    /// Modules per matrix side.
    pub modules: usize,
    pub filled_cells: usize,
    /// Row spans placed as QR boxes.
    pub spans: usize,
    /// Boxes handed to the kernel, plate included.
    pub boxes: usize,
    pub plate: bool,
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Compiles a matrix into one solid.
///
/// # Example
///
/// ```rust
/// use qr_solid::{compile, BoundsKernel, GridLayout, ModuleMatrix, PlateSpec};
///
/// let matrix = ModuleMatrix::parse("##\n.#").unwrap();
/// let layout = GridLayout::centered(2.0, 2, 1.0).unwrap();
/// let plate = PlateSpec::new(1.0, 1.0).unwrap();
///
/// let finalized = compile(&BoundsKernel::new(), &matrix, &layout, Some(&plate)).unwrap();
/// assert_eq!(finalized.report().spans, 2);
/// assert_eq!(finalized.report().boxes, 3);
/// ```
pub fn compile<K: SolidKernel>(
    kernel: &K,
    matrix: &ModuleMatrix,
    layout: &GridLayout,
    plate: Option<&PlateSpec>,
) -> Result<Finalized<K::Solid>, GenerateError> {
    compile_with_cancel(kernel, matrix, layout, plate, &CancelFlag::new())
}

/// [`compile`] with a cancellation flag checked before every row.
pub fn compile_with_cancel<K: SolidKernel>(
    kernel: &K,
    matrix: &ModuleMatrix,
    layout: &GridLayout,
    plate: Option<&PlateSpec>,
    cancel: &CancelFlag,
) -> Result<Finalized<K::Solid>, GenerateError> {
    layout.validate()?;
    if matrix.is_blank() && plate.is_none() {
        return Err(InputError::NothingToGenerate.into());
    }

    let modules = matrix.size();
    debug!(modules, block_size = layout.block_size, plate = plate.is_some(), "compiling module matrix");

    let mut report = GenerationReport {
        modules,
        filled_cells: matrix.filled_count(),
        ..GenerationReport::default()
    };

    let mut accumulator = Accumulator::new(kernel);
    for (row, cells) in matrix.rows().enumerate() {
        if cancel.is_cancelled() {
            debug!(row, "generation cancelled");
            return Err(GenerateError::Cancelled { row });
        }
        for span in row_spans(row, cells) {
            let primitive = layout.place(&span);
            trace!(row, col = span.start_col, length = span.length, "placing span");
            accumulator.add(&primitive, CellRef::new(span.row, span.start_col))?;
            report.spans += 1;
        }
    }
    report.boxes = accumulator.box_count();

    let qr = accumulator.into_solid()?;
    let solid = match plate {
        Some(spec) => {
            report.plate = true;
            report.boxes += 1;
            compose_plate(kernel, qr, &plate_box(layout, modules, spec))?
        }
        None => qr.ok_or(InputError::NothingToGenerate)?,
    };

    info!(
        modules,
        spans = report.spans,
        boxes = report.boxes,
        plate = report.plate,
        "generated QR solid"
    );
    Ok(Finalized::new(solid, report))
}

/// Compiles a matrix with a centered footprint of `options.size`.
pub fn generate<K: SolidKernel>(
    kernel: &K,
    matrix: &ModuleMatrix,
    options: &QrOptions,
) -> Result<Finalized<K::Solid>, GenerateError> {
    options.validate()?;
    let plate = options.plate()?;
    let layout = options.layout(matrix.size())?;
    compile(kernel, matrix, &layout, plate.as_ref())
}

/// Encodes `request` through `source` and compiles the resulting matrix.
///
/// Options are validated before the encoder runs.
pub fn generate_from_source<M, K>(
    source: &M,
    kernel: &K,
    request: &EncodeRequest<'_>,
    options: &QrOptions,
) -> Result<Finalized<K::Solid>, GenerateError>
where
    M: MatrixSource + ?Sized,
    K: SolidKernel,
{
    options.validate()?;
    let rows = source.encode(request)?;
    let matrix = ModuleMatrix::from_rows(rows)?;
    debug!(modules = matrix.size(), data_len = request.data.len(), "encoded matrix");
    generate(kernel, &matrix, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds_kernel::BoundsKernel;
    use crate::error::GeometryStage;
    use crate::geometry::BoxPrimitive;
    use crate::kernel::{KernelError, SourceError};
    use std::sync::Arc;

    struct FixedSource(Vec<Vec<bool>>);

    impl MatrixSource for FixedSource {
        fn encode(&self, _request: &EncodeRequest<'_>) -> Result<Vec<Vec<bool>>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl MatrixSource for FailingSource {
        fn encode(&self, request: &EncodeRequest<'_>) -> Result<Vec<Vec<bool>>, SourceError> {
            Err(SourceError::DataTooLong {
                len: request.data.len(),
                min_version: request.min_version,
            })
        }
    }

    fn no_plate(size: f64) -> QrOptions {
        QrOptions {
            size,
            create_base: false,
            ..QrOptions::default()
        }
    }

    #[test]
    fn test_options_defaults() {
        let options = QrOptions::default();
        assert_eq!(options.size, 25.0);
        assert_eq!(options.thickness, 1.0);
        assert!(options.create_base);
        assert_eq!(options.margin, 2.0);
        assert_eq!(options.base_thickness, 2.0);
    }

    #[test]
    fn test_blank_matrix_without_plate_is_rejected() {
        let matrix = ModuleMatrix::parse("..\n..").unwrap();
        let err = generate(&BoundsKernel::new(), &matrix, &no_plate(2.0)).unwrap_err();
        assert_eq!(err, GenerateError::Input(InputError::NothingToGenerate));
    }

    #[test]
    fn test_blank_matrix_with_plate_is_plate_only() {
        let matrix = ModuleMatrix::parse("..\n..").unwrap();
        let kernel = BoundsKernel::new();
        let finalized = generate(&kernel, &matrix, &QrOptions::default()).unwrap();
        assert_eq!(finalized.report().spans, 0);
        assert_eq!(finalized.report().boxes, 1);
        assert!(finalized.report().plate);
        assert_eq!(kernel.union_count(), 0);
    }

    #[test]
    fn test_invalid_options_fail_before_kernel() {
        let matrix = ModuleMatrix::parse("#").unwrap();
        let kernel = BoundsKernel::new();

        let options = QrOptions {
            base_thickness: 0.0,
            ..QrOptions::default()
        };
        let err = generate(&kernel, &matrix, &options).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Configuration(ConfigurationError::NonPositivePlateThickness(_))
        ));

        let err = generate(&kernel, &matrix, &no_plate(-1.0)).unwrap_err();
        assert_eq!(err, GenerateError::Input(InputError::InvalidFootprintSize(-1.0)));
        assert_eq!(kernel.box_count(), 0);
    }

    #[test]
    fn test_zero_thickness_names_first_cell() {
        let matrix = ModuleMatrix::parse("..\n.#").unwrap();
        let options = QrOptions {
            thickness: 0.0,
            ..no_plate(2.0)
        };
        let err = generate(&BoundsKernel::new(), &matrix, &options).unwrap_err();
        match err {
            GenerateError::Geometry(geometry) => {
                assert_eq!(geometry.stage, GeometryStage::CreateBox);
                assert_eq!(geometry.cell, Some(CellRef::new(1, 1)));
            }
            other => panic!("expected geometry error, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_before_first_row() {
        let matrix = ModuleMatrix::parse("#").unwrap();
        let layout = GridLayout::centered(1.0, 1, 1.0).unwrap();
        let cancel = Arc::new(CancelFlag::new());
        cancel.cancel();

        let err = compile_with_cancel(&BoundsKernel::new(), &matrix, &layout, None, &cancel)
            .unwrap_err();
        assert_eq!(err, GenerateError::Cancelled { row: 0 });
    }

    /// Raises the flag while performing the `at`-th union.
    struct CancellingKernel<'a> {
        inner: BoundsKernel,
        cancel: &'a CancelFlag,
        at: usize,
    }

    impl SolidKernel for CancellingKernel<'_> {
        type Solid = crate::bounds_kernel::BoundsSolid;

        fn create_box(&self, primitive: &BoxPrimitive) -> Result<Self::Solid, KernelError> {
            self.inner.create_box(primitive)
        }

        fn union(&self, a: Self::Solid, b: Self::Solid) -> Result<Self::Solid, KernelError> {
            let solid = self.inner.union(a, b)?;
            if self.inner.union_count() == self.at {
                self.cancel.cancel();
            }
            Ok(solid)
        }
    }

    #[test]
    fn test_cancel_during_union_stops_at_next_row() {
        let matrix = ModuleMatrix::parse("##.\n#.#\n###").unwrap();
        let layout = GridLayout::centered(3.0, 3, 1.0).unwrap();
        let cancel = CancelFlag::new();
        // row 0 creates the first box, row 1 performs unions 1 and 2
        let kernel = CancellingKernel {
            inner: BoundsKernel::new(),
            cancel: &cancel,
            at: 1,
        };

        let err = compile_with_cancel(&kernel, &matrix, &layout, None, &cancel).unwrap_err();
        assert_eq!(err, GenerateError::Cancelled { row: 2 });
        // the row in flight finishes, nothing from row 2 is placed
        assert_eq!(kernel.inner.union_count(), 2);
        assert_eq!(kernel.inner.box_count(), 3);
    }

    #[test]
    fn test_generate_from_source() {
        let source = FixedSource(vec![vec![true, true], vec![false, true]]);
        let request = EncodeRequest::new("anything");
        let finalized =
            generate_from_source(&source, &BoundsKernel::new(), &request, &no_plate(2.0)).unwrap();
        assert_eq!(finalized.report().modules, 2);
        assert_eq!(finalized.report().spans, 2);
        assert_eq!(finalized.report().filled_cells, 3);
    }

    #[test]
    fn test_source_errors_propagate() {
        let request = EncodeRequest::new("too long");
        let err = generate_from_source(&FailingSource, &BoundsKernel::new(), &request, &no_plate(2.0))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Source(SourceError::DataTooLong { len: 8, .. })));

        let ragged = FixedSource(vec![vec![true], vec![true]]);
        let err = generate_from_source(&ragged, &BoundsKernel::new(), &request, &no_plate(2.0))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Input(InputError::NotSquare { .. })));
    }
}
