//! # Signboard Command
//!
//! Builds a rectangular board with a QR code and an optional icon embossed
//! on its top face. The three parts are generated in parallel and placed as
//! independent components; they are never unioned together.

use config::constants::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_THICKNESS, DEFAULT_BOARD_WIDTH, DEFAULT_EMBOSS_THICKNESS,
    DEFAULT_ICON_ENABLED, DEFAULT_ICON_POSITION, DEFAULT_ICON_SIZE, DEFAULT_MIN_VERSION,
    DEFAULT_SIGNBOARD_QR_POSITION, DEFAULT_SIGNBOARD_QR_SIZE, DEFAULT_SIGNBOARD_TEXT,
    ICON_RESOLUTION,
};
use glam::DVec3;
use qr_solid::{
    generate, Assembly, BoxPrimitive, ErrorCorrection, GenerateError, GeometryError, GeometryStage,
    Placement, QrOptions, SolidKernel,
};
use serde::{Deserialize, Serialize};
use solid_mesh::{MeshKernel, RectSolid};
use tracing::info;

use super::icon::icon_matrix;
use super::qr_code::{generate_qr, QrCodeInputs};
use super::{BOARD_COMPONENT, ICON_COMPONENT, QR_COMPONENT};
use crate::document::{ComponentId, Document};
use crate::error::CommandError;
use crate::registry::{CommandHandler, CommandOutcome};

// =============================================================================
// INPUTS
// =============================================================================

/// Board dimensions. The board is centered on the origin and spans
/// `z ∈ [0, thickness]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardInputs {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

impl Default for BoardInputs {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            thickness: DEFAULT_BOARD_THICKNESS,
        }
    }
}

/// QR code embossed on the board. `x`/`y` is the footprint center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignboardQrInputs {
    pub text: String,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub thickness: f64,
    pub error_correction: ErrorCorrection,
    pub min_version: u8,
}

impl Default for SignboardQrInputs {
    fn default() -> Self {
        Self {
            text: DEFAULT_SIGNBOARD_TEXT.to_string(),
            size: DEFAULT_SIGNBOARD_QR_SIZE,
            x: DEFAULT_SIGNBOARD_QR_POSITION[0],
            y: DEFAULT_SIGNBOARD_QR_POSITION[1],
            thickness: DEFAULT_EMBOSS_THICKNESS,
            error_correction: ErrorCorrection::Medium,
            min_version: DEFAULT_MIN_VERSION,
        }
    }
}

impl SignboardQrInputs {
    /// Same inputs as the QR code command, without a plate.
    fn to_qr_inputs(&self) -> QrCodeInputs {
        QrCodeInputs {
            text: self.text.clone(),
            size: self.size,
            thickness: self.thickness,
            create_base: false,
            error_correction: self.error_correction,
            min_version: self.min_version,
            ..QrCodeInputs::default()
        }
    }
}

/// Optional icon embossed on the board. `x`/`y` is the glyph center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconInputs {
    pub enabled: bool,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub thickness: f64,
}

impl Default for IconInputs {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ICON_ENABLED,
            size: DEFAULT_ICON_SIZE,
            x: DEFAULT_ICON_POSITION[0],
            y: DEFAULT_ICON_POSITION[1],
            thickness: DEFAULT_EMBOSS_THICKNESS,
        }
    }
}

/// Dialog inputs of the signboard command.
///
/// # Example
///
/// ```rust
/// use qr_host::commands::SignboardInputs;
///
/// let inputs: SignboardInputs =
///     serde_json::from_str(r#"{"board": {"width": 80.0}, "icon": {"enabled": false}}"#).unwrap();
/// assert_eq!(inputs.board.width, 80.0);
/// assert_eq!(inputs.board.height, 150.0);
/// assert!(!inputs.icon.enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignboardInputs {
    pub board: BoardInputs,
    pub qr: SignboardQrInputs,
    pub icon: IconInputs,
}

impl SignboardInputs {
    pub fn validate(&self) -> Result<(), CommandError> {
        CommandError::require_positive("board width", self.board.width)?;
        CommandError::require_positive("board height", self.board.height)?;
        CommandError::require_positive("board thickness", self.board.thickness)?;
        CommandError::require_positive("QR size", self.qr.size)?;
        CommandError::require_positive("QR thickness", self.qr.thickness)?;
        if self.icon.enabled {
            CommandError::require_positive("icon size", self.icon.size)?;
            CommandError::require_positive("icon thickness", self.icon.thickness)?;
        }
        Ok(())
    }
}

// =============================================================================
// PARTS
// =============================================================================

fn build_board(kernel: &MeshKernel, board: &BoardInputs) -> Result<RectSolid, CommandError> {
    let primitive = BoxPrimitive::new(
        DVec3::new(0.0, 0.0, board.thickness / 2.0),
        board.width,
        board.height,
        board.thickness,
    );
    kernel.create_box(&primitive).map_err(|source| {
        let err = GeometryError::new(GeometryStage::CreateBox, None, source);
        CommandError::Generate(GenerateError::Geometry(err))
    })
}

fn build_qr(kernel: &MeshKernel, qr: &SignboardQrInputs) -> Result<RectSolid, CommandError> {
    Ok(generate_qr(kernel, &qr.to_qr_inputs())?.into_solid())
}

fn build_icon(kernel: &MeshKernel, icon: &IconInputs) -> Result<Option<RectSolid>, CommandError> {
    if !icon.enabled {
        return Ok(None);
    }
    let matrix = icon_matrix(ICON_RESOLUTION).map_err(GenerateError::from)?;
    let options = QrOptions {
        size: icon.size,
        thickness: icon.thickness,
        create_base: false,
        ..QrOptions::default()
    };
    Ok(Some(generate(kernel, &matrix, &options)?.into_solid()))
}

// =============================================================================
// COMMAND
// =============================================================================

/// The signboard command.
#[derive(Debug, Clone, Default)]
pub struct SignboardCommand {
    kernel: MeshKernel,
}

impl SignboardCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kernel(kernel: MeshKernel) -> Self {
        Self { kernel }
    }

    /// Builds board, QR code and icon, then places them in that order.
    ///
    /// QR code and icon sit on the board's top face at their `x`/`y`
    /// offsets. Nothing is placed unless all parts were built.
    pub fn run(&self, inputs: &SignboardInputs, document: &mut Document) -> Result<Vec<ComponentId>, CommandError> {
        inputs.validate()?;

        let kernel = &self.kernel;
        let (board, (qr, icon)) = rayon::join(
            || build_board(kernel, &inputs.board),
            || {
                rayon::join(
                    || build_qr(kernel, &inputs.qr),
                    || build_icon(kernel, &inputs.icon),
                )
            },
        );
        let (board, qr, icon) = (board?, qr?, icon?);

        let top = inputs.board.thickness;
        let mut assembly = Assembly::new();
        assembly
            .add(document.unique_name(BOARD_COMPONENT), board, Placement::identity())
            .add(
                document.unique_name(QR_COMPONENT),
                qr,
                Placement::translation(inputs.qr.x, inputs.qr.y, top),
            );
        if let Some(icon) = icon {
            assembly.add(
                document.unique_name(ICON_COMPONENT),
                icon,
                Placement::translation(inputs.icon.x, inputs.icon.y, top),
            );
        }

        let ids = assembly.place_into(document)?;
        info!(components = ids.len(), "signboard generated");
        Ok(ids)
    }
}

impl CommandHandler for SignboardCommand {
    fn execute(&mut self, inputs: &str, document: &mut Document) -> Result<CommandOutcome, CommandError> {
        let inputs: SignboardInputs = serde_json::from_str(inputs)?;
        let components = self.run(&inputs, document)?;
        Ok(CommandOutcome { components })
    }
}
