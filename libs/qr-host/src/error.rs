//! # Command Errors
//!
//! Everything a host command can fail with. Rendering to user-facing text
//! lives in [`crate::messages`].

use qr_solid::{GenerateError, SceneError};
use thiserror::Error;

/// Failure of a registered command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No command is registered under this id
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Inputs JSON could not be parsed
    #[error("invalid command inputs: {0}")]
    InvalidInputs(#[from] serde_json::Error),

    /// A numeric input is out of range
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The pipeline failed
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The document refused a component
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl CommandError {
    /// Rejects zero, negative and non-finite values.
    pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidParameter { name, value })
        }
    }
}
