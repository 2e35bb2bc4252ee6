//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use std::fmt;

/// Where the bot is in its `login` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Created,
    DatabaseConnecting,
    ModulesInitializing,
    ModulesStarting,
    AuthenticatingTransport,
    Online,
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::DatabaseConnecting => "database-connecting",
            Self::ModulesInitializing => "modules-initializing",
            Self::ModulesStarting => "modules-starting",
            Self::AuthenticatingTransport => "authenticating-transport",
            Self::Online => "online",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Module lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Start,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Start => f.write_str("start"),
        }
    }
}

/// A chat message as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub room_id: String,
    pub sender: String,
    pub body: String,
}
