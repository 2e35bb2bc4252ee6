//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat, transport, database).
//! Allows for pluggable implementations in the Infrastructure layer.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Abstract interface for a Chat Provider (e.g., a Matrix room)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a markdown message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String>;

    /// Send a notification (not tracked)
    async fn send_notification(&self, content: &str) -> Result<()>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<()>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// The messaging platform session the bot logs in to.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticates with `secret` and returns the session token.
    async fn authenticate(&self, secret: &str) -> Result<String>;
}

/// A ready handle on a document database.
#[async_trait]
pub trait Database: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    async fn store(&self, collection: &str, id: &str, document: Value) -> Result<()>;
}

/// Opens database connections by name.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Resolves once the connection is ready for use.
    async fn connect(&self, name: &str) -> Result<Arc<dyn Database>>;
}
