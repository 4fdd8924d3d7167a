//! # Command Registry
//!
//! Maps command ids to their definitions and handlers. Commands are
//! registered when the add-in starts and removed when it stops; registering
//! an id that is still present replaces the stale entry.

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};

use tracing::{error, info};

use crate::document::{ComponentId, Document};
use crate::error::CommandError;
use crate::messages;

/// Toolbar-facing description of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub id: String,
    pub name: String,
    pub tooltip: String,
}

impl CommandDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tooltip: tooltip.into(),
        }
    }
}

/// Components placed by one command run, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub components: Vec<ComponentId>,
}

/// Executes a command against a document.
///
/// `inputs` is the JSON object the input dialog would have produced. Missing
/// fields take their defaults.
pub trait CommandHandler: Send {
    fn execute(&mut self, inputs: &str, document: &mut Document) -> Result<CommandOutcome, CommandError>;
}

struct Registered {
    definition: CommandDefinition,
    handler: Box<dyn CommandHandler>,
}

/// Registered commands keyed by id.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Registered>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `definition.id`.
    ///
    /// Returns `true` when a stale registration with the same id was
    /// replaced.
    pub fn activate(&mut self, definition: CommandDefinition, handler: Box<dyn CommandHandler>) -> bool {
        let id = definition.id.clone();
        let replaced = self
            .commands
            .insert(id.clone(), Registered { definition, handler })
            .is_some();
        info!(command = %id, replaced, "command activated");
        replaced
    }

    /// Removes a command. Returns its definition if it was registered.
    pub fn deactivate(&mut self, id: &str) -> Option<CommandDefinition> {
        let removed = self.commands.remove(id).map(|r| r.definition);
        if removed.is_some() {
            info!(command = %id, "command deactivated");
        }
        removed
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub fn definition(&self, id: &str) -> Option<&CommandDefinition> {
        self.commands.get(id).map(|r| &r.definition)
    }

    /// Definitions in id order.
    pub fn definitions(&self) -> impl Iterator<Item = &CommandDefinition> + '_ {
        self.commands.values().map(|r| &r.definition)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs a registered command.
    ///
    /// Failures are logged with their user-facing message before being
    /// returned.
    pub fn execute(&mut self, id: &str, inputs: &str, document: &mut Document) -> Result<CommandOutcome, CommandError> {
        let Some(registered) = self.commands.get_mut(id) else {
            let err = CommandError::UnknownCommand(id.to_string());
            error!(command = %id, message = %messages::user_message(&err), "command failed");
            return Err(err);
        };

        info!(command = %id, "executing command");
        match registered.handler.execute(inputs, document) {
            Ok(outcome) => {
                info!(command = %id, components = outcome.components.len(), "command finished");
                Ok(outcome)
            }
            Err(err) => {
                error!(command = %id, message = %messages::user_message(&err), "command failed");
                Err(err)
            }
        }
    }
}

/// Process-wide registry shared by the add-in entry points.
pub fn global() -> &'static Mutex<CommandRegistry> {
    static REGISTRY: OnceLock<Mutex<CommandRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(CommandRegistry::new()))
}
