//! # Add-in Lifecycle
//!
//! Entry points called when the add-in is loaded and unloaded. Loading
//! registers both commands; unloading removes them again.

use tracing::info;

use crate::cache::GenerationCache;
use crate::commands::{QrCodeCommand, SignboardCommand};
use crate::registry::{CommandDefinition, CommandRegistry};

/// Id of the QR code command.
pub const QR_CODE_COMMAND_ID: &str = "QrCodeGeneratorCmd";

/// Id of the signboard command.
pub const SIGNBOARD_COMMAND_ID: &str = "SignboardAutomatorCmd";

pub fn qr_code_definition() -> CommandDefinition {
    CommandDefinition::new(
        QR_CODE_COMMAND_ID,
        "QR Code Generator",
        "Generates a 3D QR code from text, optionally on a base plate",
    )
}

pub fn signboard_definition() -> CommandDefinition {
    CommandDefinition::new(
        SIGNBOARD_COMMAND_ID,
        "Signboard Automator",
        "Creates a signboard with an embossed QR code and icon",
    )
}

/// Registers both commands. Stale registrations from an earlier load are
/// replaced.
pub fn run(registry: &mut CommandRegistry) {
    registry.activate(
        qr_code_definition(),
        Box::new(QrCodeCommand::new().with_cache(GenerationCache::default())),
    );
    registry.activate(signboard_definition(), Box::new(SignboardCommand::new()));
    info!(commands = registry.len(), "add-in started");
}

/// Removes both commands.
pub fn stop(registry: &mut CommandRegistry) {
    registry.deactivate(QR_CODE_COMMAND_ID);
    registry.deactivate(SIGNBOARD_COMMAND_ID);
    info!(commands = registry.len(), "add-in stopped");
}
