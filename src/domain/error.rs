//! # Errors
//!
//! Typed failures of the registries and of the `login` sequence.
//! Hooks and collaborators return `anyhow` errors, which are kept as the source.

use crate::domain::types::{LoginState, Phase};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("alias `{alias}` of command `{command}` is already taken by `{existing}`")]
    DuplicateAlias {
        alias: String,
        command: String,
        existing: String,
    },

    #[error("command `{0}` needs at least one non-empty alias")]
    InvalidCommand(String),

    #[error("unknown module `{0}`")]
    UnknownModule(String),

    #[error("operation not allowed while the bot is {0}")]
    InvalidState(LoginState),

    #[error("failed to connect to database `{name}`")]
    DatabaseConnection {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("module `{module}` failed during {phase}")]
    ModuleLifecycle {
        module: String,
        phase: Phase,
        #[source]
        source: BoxError,
    },

    #[error("transport authentication failed")]
    TransportAuth(#[source] BoxError),
}
