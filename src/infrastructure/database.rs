//! # Redis Document Store
//!
//! Implements `Database` on top of Redis: every document is a JSON string stored under
//! `<database>:<collection>:<id>`, so several bots can share one server by using
//! different database names.

use crate::domain::traits::{Database, DatabaseConnector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::Value;
use std::sync::Arc;

pub struct RedisConnector {
    url: String,
}

impl RedisConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl DatabaseConnector for RedisConnector {
    async fn connect(&self, name: &str) -> Result<Arc<dyn Database>> {
        let client = redis::Client::open(self.url.as_str())
            .with_context(|| format!("Invalid redis url {}", self.url))?;
        // The manager performs the initial connection, so success means ready.
        let connection = client
            .get_connection_manager()
            .await
            .with_context(|| format!("Failed to connect to {}", self.url))?;
        Ok(Arc::new(RedisDatabase {
            name: name.to_string(),
            connection,
        }))
    }
}

pub struct RedisDatabase {
    name: String,
    connection: ConnectionManager,
}

impl RedisDatabase {
    fn key(&self, collection: &str, id: &str) -> String {
        document_key(&self.name, collection, id)
    }
}

fn document_key(database: &str, collection: &str, id: &str) -> String {
    format!("{database}:{collection}:{id}")
}

#[async_trait]
impl Database for RedisDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(self.key(collection, id)).await?;
        raw.map(|s| serde_json::from_str(&s).context("Stored document is not valid JSON"))
            .transpose()
    }

    async fn store(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .set(self.key(collection, id), serde_json::to_string(&document)?)
            .await?;
        Ok(())
    }
}
