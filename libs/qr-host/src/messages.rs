//! # User Messages
//!
//! Turns command failures into the text shown to the person running the
//! command. No other module formats failures for display.

use qr_solid::{GenerateError, InputError, SceneError, SourceError};

use crate::error::CommandError;

/// Dialog title for a failure.
pub fn title(err: &CommandError) -> &'static str {
    match err {
        CommandError::UnknownCommand(_) => "Command Not Available",
        CommandError::InvalidInputs(_) | CommandError::InvalidParameter { .. } => "Invalid Input",
        CommandError::Generate(GenerateError::Cancelled { .. }) => "Cancelled",
        CommandError::Generate(_) => "Generation Failed",
        CommandError::Scene(_) => "Document Error",
    }
}

/// One-paragraph description of a failure.
///
/// # Example
///
/// ```rust
/// use qr_host::{messages, CommandError};
/// use qr_solid::{GenerateError, InputError};
///
/// let err = CommandError::from(GenerateError::from(InputError::NothingToGenerate));
/// assert!(messages::user_message(&err).starts_with("No geometry generated"));
/// ```
pub fn user_message(err: &CommandError) -> String {
    match err {
        CommandError::UnknownCommand(id) => format!("The command '{id}' is not registered."),
        CommandError::InvalidInputs(e) => format!("The command inputs could not be read: {e}."),
        CommandError::InvalidParameter { name, value } => {
            format!("The {name} must be a positive number (got {value}).")
        }
        CommandError::Generate(e) => generate_message(e),
        CommandError::Scene(SceneError::DuplicateName(name)) => {
            format!("A component named '{name}' already exists in the document.")
        }
        CommandError::Scene(SceneError::Rejected(reason)) => {
            format!("The document rejected the result: {reason}.")
        }
    }
}

fn generate_message(err: &GenerateError) -> String {
    match err {
        GenerateError::Input(InputError::NothingToGenerate) => {
            "No geometry generated: the code has no dark modules and no base plate was requested."
                .to_string()
        }
        GenerateError::Input(InputError::InvalidFootprintSize(size)) => {
            format!("The QR code size must be a positive number (got {size}).")
        }
        GenerateError::Input(e) => format!("The module matrix is not usable: {e}."),
        GenerateError::Configuration(e) => format!("Invalid base plate settings: {e}."),
        GenerateError::Source(SourceError::DataTooLong { len, .. }) => format!(
            "The text is too long for a QR code ({len} bytes). Shorten it or lower the error correction level."
        ),
        GenerateError::Source(e) => format!("QR encoding failed: {e}."),
        GenerateError::Geometry(e) => match e.cell {
            Some(cell) => format!(
                "Geometry failed at module {cell} ({stage}): {source}.",
                stage = e.stage,
                source = e.source
            ),
            None => format!("Geometry failed: {e}."),
        },
        GenerateError::Cancelled { row } => format!("Generation was cancelled at row {row}."),
    }
}
