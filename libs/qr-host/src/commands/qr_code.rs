//! # QR Code Command
//!
//! Encodes text, builds the QR solid with an optional backing plate and
//! places it as a `QR_Code` component at the document origin.

use config::constants::{
    DEFAULT_BASE_MARGIN, DEFAULT_BASE_THICKNESS, DEFAULT_CREATE_BASE, DEFAULT_MIN_VERSION,
    DEFAULT_QR_SIZE, DEFAULT_QR_TEXT, DEFAULT_QR_THICKNESS,
};
use qr_encode::QrEncoder;
use qr_solid::{
    generate_from_source, EncodeRequest, ErrorCorrection, Finalized, Placement, QrOptions,
    SceneSink, SubAssembly,
};
use serde::{Deserialize, Serialize};
use solid_mesh::{MeshKernel, RectSolid};
use tracing::info;

use super::QR_COMPONENT;
use crate::cache::{CacheKey, GenerationCache};
use crate::document::{ComponentId, Document};
use crate::error::CommandError;
use crate::registry::{CommandHandler, CommandOutcome};

/// Dialog inputs of the QR code command.
///
/// # Example
///
/// ```rust
/// use qr_host::commands::QrCodeInputs;
///
/// let inputs: QrCodeInputs = serde_json::from_str(r#"{"text": "hi", "create_base": false}"#).unwrap();
/// assert_eq!(inputs.text, "hi");
/// assert!(!inputs.create_base);
/// assert_eq!(inputs.size, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCodeInputs {
    pub text: String,
    pub size: f64,
    pub thickness: f64,
    pub create_base: bool,
    pub margin: f64,
    pub base_thickness: f64,
    pub error_correction: ErrorCorrection,
    pub min_version: u8,
}

impl Default for QrCodeInputs {
    fn default() -> Self {
        Self {
            text: DEFAULT_QR_TEXT.to_string(),
            size: DEFAULT_QR_SIZE,
            thickness: DEFAULT_QR_THICKNESS,
            create_base: DEFAULT_CREATE_BASE,
            margin: DEFAULT_BASE_MARGIN,
            base_thickness: DEFAULT_BASE_THICKNESS,
            error_correction: ErrorCorrection::Low,
            min_version: DEFAULT_MIN_VERSION,
        }
    }
}

impl QrCodeInputs {
    pub fn options(&self) -> QrOptions {
        QrOptions {
            size: self.size,
            thickness: self.thickness,
            create_base: self.create_base,
            margin: self.margin,
            base_thickness: self.base_thickness,
        }
    }

    pub fn request(&self) -> EncodeRequest<'_> {
        EncodeRequest::new(&self.text)
            .with_error_correction(self.error_correction)
            .with_min_version(self.min_version)
    }

    /// Host-side checks. Size and plate parameters are checked by the
    /// pipeline itself.
    pub fn validate(&self) -> Result<(), CommandError> {
        CommandError::require_positive("thickness", self.thickness)
    }
}

/// Encodes and builds the QR solid without placing it.
pub fn generate_qr(kernel: &MeshKernel, inputs: &QrCodeInputs) -> Result<Finalized<RectSolid>, CommandError> {
    inputs.validate()?;
    Ok(generate_from_source(
        &QrEncoder::new(),
        kernel,
        &inputs.request(),
        &inputs.options(),
    )?)
}

/// The QR code command, optionally caching solids by input.
#[derive(Debug, Default)]
pub struct QrCodeCommand {
    kernel: MeshKernel,
    cache: Option<GenerationCache>,
}

impl QrCodeCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, cache: GenerationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_kernel(mut self, kernel: MeshKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn cache(&self) -> Option<&GenerationCache> {
        self.cache.as_ref()
    }

    /// Builds (or reuses) the solid and places it in `document`.
    pub fn run(&mut self, inputs: &QrCodeInputs, document: &mut Document) -> Result<ComponentId, CommandError> {
        inputs.validate()?;
        let name = document.unique_name(QR_COMPONENT);

        let key = self.cache.as_ref().map(|_| CacheKey::qr(inputs));
        let cached = match (self.cache.as_mut(), key.as_ref()) {
            (Some(cache), Some(key)) => cache.get(key),
            _ => None,
        };
        if let Some(solid) = cached {
            let body = (*solid).clone();
            return Ok(document.place(SubAssembly::single(name, body, Placement::identity()))?);
        }

        let finalized = generate_qr(&self.kernel, inputs)?;
        info!(
            component = %name,
            modules = finalized.report().modules,
            boxes = finalized.report().boxes,
            "QR code generated"
        );
        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
            cache.put(key, finalized.solid().clone());
        }
        Ok(finalized.emit(document, name, Placement::identity())?)
    }
}

impl CommandHandler for QrCodeCommand {
    fn execute(&mut self, inputs: &str, document: &mut Document) -> Result<CommandOutcome, CommandError> {
        let inputs: QrCodeInputs = serde_json::from_str(inputs)?;
        let id = self.run(&inputs, document)?;
        Ok(CommandOutcome {
            components: vec![id],
        })
    }
}
