//! # Modules
//!
//! Feature bundles with `init`/`start` hooks, and the registry that drives them.
//! Every module is initialised before any module is started, one at a time, in
//! registration order. A module may register commands from `init`, so a later
//! `start` always sees the full command set.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::application::commands::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::error::BotError;
use crate::domain::traits::Database;
use crate::domain::types::Phase;

/// Handed to lifecycle hooks.
pub struct ModuleContext<'a> {
    pub commands: &'a mut CommandRegistry,
    pub config: &'a AppConfig,
    pub database: Option<&'a Arc<dyn Database>>,
}

#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    /// Commands known at load time. Registered before any hook runs.
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    async fn init(&mut self, _ctx: &mut ModuleContext<'_>) -> Result<()> {
        Ok(())
    }

    async fn start(&mut self, _ctx: &mut ModuleContext<'_>) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Box<dyn Module>) {
        tracing::info!("Loaded module {}", module.name());
        self.modules.push(module);
    }

    pub async fn init(&mut self, ctx: &mut ModuleContext<'_>) -> Result<(), BotError> {
        self.run_phase(Phase::Init, ctx).await
    }

    pub async fn start(&mut self, ctx: &mut ModuleContext<'_>) -> Result<(), BotError> {
        self.run_phase(Phase::Start, ctx).await
    }

    /// Runs one hook per module in order and stops at the first failure.
    async fn run_phase(&mut self, phase: Phase, ctx: &mut ModuleContext<'_>) -> Result<(), BotError> {
        for module in self.modules.iter_mut() {
            tracing::debug!("Running {} for module {}", phase, module.name());
            let result = match phase {
                Phase::Init => module.init(ctx).await,
                Phase::Start => module.start(ctx).await,
            };
            if let Err(e) = result {
                tracing::error!("Module {} failed during {}: {:#}", module.name(), phase, e);
                return Err(BotError::ModuleLifecycle {
                    module: module.name().to_string(),
                    phase,
                    source: e.into(),
                });
            }
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
