//! In-memory stand-ins for the transport, database and chat, shared by the unit tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::commands::{Command, CommandContext, CommandHandler};
use crate::application::modules::{Module, ModuleContext};
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, Database, DatabaseConnector, Transport};
use crate::domain::types::Phase;

pub fn test_config() -> AppConfig {
    AppConfig::parse(
        r#"
services:
  matrix:
    username: bot
    password: secret
    homeserver: https://matrix.example.org
"#,
    )
    .unwrap()
}

/// Ordered record of calls across several fakes.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    async fn run(&self, _ctx: CommandContext<'_>) -> Result<()> {
        Ok(())
    }
}

pub struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn run(&self, _ctx: CommandContext<'_>) -> Result<()> {
        Err(anyhow!("boom"))
    }
}

pub struct RecordingModule {
    name: String,
    log: EventLog,
    fail_on: Option<Phase>,
    commands: Vec<Command>,
}

impl RecordingModule {
    pub fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            fail_on: None,
            commands: Vec::new(),
        }
    }

    pub fn fail_on(mut self, phase: Phase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    fn record(&self, phase: Phase) -> Result<()> {
        self.log.push(format!("{}:{}", self.name, phase));
        if self.fail_on == Some(phase) {
            return Err(anyhow!("{} refused to {}", self.name, phase));
        }
        Ok(())
    }
}

#[async_trait]
impl Module for RecordingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.clone()
    }

    async fn init(&mut self, _ctx: &mut ModuleContext<'_>) -> Result<()> {
        self.record(Phase::Init)
    }

    async fn start(&mut self, _ctx: &mut ModuleContext<'_>) -> Result<()> {
        self.record(Phase::Start)
    }
}

pub struct FakeTransport {
    log: EventLog,
    fail: bool,
}

impl FakeTransport {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn authenticate(&self, secret: &str) -> Result<String> {
        self.log.push("auth");
        if self.fail {
            return Err(anyhow!("invalid password"));
        }
        Ok(format!("token-{secret}"))
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    name: String,
    documents: Mutex<HashMap<(String, String), Value>>,
}

impl MemoryDatabase {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            documents: Mutex::default(),
        }
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn store(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), id.to_string()), document);
        Ok(())
    }
}

pub struct FakeConnector {
    log: EventLog,
    fail: bool,
}

impl FakeConnector {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl DatabaseConnector for FakeConnector {
    async fn connect(&self, name: &str) -> Result<Arc<dyn Database>> {
        self.log.push(format!("connect:{name}"));
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(Arc::new(MemoryDatabase::named(name)))
    }
}

#[derive(Default)]
pub struct FakeChat {
    sent: Mutex<Vec<String>>,
    typing: Mutex<Vec<bool>>,
}

impl FakeChat {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn typing_changes(&self) -> Vec<bool> {
        self.typing.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn send_message(&self, content: &str) -> Result<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn typing(&self, active: bool) -> Result<()> {
        self.typing.lock().unwrap().push(active);
        Ok(())
    }

    fn room_id(&self) -> String {
        "!room:example.org".to_string()
    }
}
