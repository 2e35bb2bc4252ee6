//! # Command Modules
//!
//! The built-in module catalog (`core`, `memo`) and loading of the configured
//! selection plus any scripted modules from the module directory.

pub mod help;
pub mod memo;
pub mod misc;
pub mod scripted;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::bot::Bot;
use crate::application::commands::Command;
use crate::application::modules::{Module, ModuleContext};
use crate::domain::config::{ModuleSelection, ModulesConfig};
use crate::domain::error::BotError;
use crate::strings::logs;

pub const BUILTIN: &[&str] = &["core", "memo"];

pub fn builtin(name: &str) -> Option<Box<dyn Module>> {
    match name {
        "core" => Some(Box::new(CoreModule)),
        "memo" => Some(Box::new(memo::MemoModule)),
        _ => None,
    }
}

/// Built-in modules named by `selection`, in selection order (catalog order for `*`).
pub fn select(selection: &ModuleSelection) -> Result<Vec<Box<dyn Module>>, BotError> {
    match selection {
        ModuleSelection::All => Ok(BUILTIN.iter().filter_map(|name| builtin(name)).collect()),
        ModuleSelection::Only(names) => names
            .iter()
            .map(|name| builtin(name).ok_or_else(|| BotError::UnknownModule(name.clone())))
            .collect(),
    }
}

/// Loads the selected built-ins, then the scripted modules found in `config.path`.
pub fn load_all(bot: &mut Bot, config: &ModulesConfig) -> Result<()> {
    for module in select(&config.default)? {
        bot.load_module(module)?;
    }
    if let Some(path) = &config.path {
        for module in scripted::load_dir(path)? {
            bot.load_module(Box::new(module))?;
        }
    }
    if bot.modules().is_empty() {
        tracing::warn!("{}", logs::NO_MODULES);
    }
    tracing::info!(
        "{}",
        logs::modules_loaded(bot.modules().len(), bot.commands().len())
    );
    Ok(())
}

/// Help, ping, about and modules.
pub struct CoreModule;

#[async_trait]
impl Module for CoreModule {
    fn name(&self) -> &str {
        "core"
    }

    fn commands(&self) -> Vec<Command> {
        vec![
            Command::new("Help", &["help", "h"], "core", help::HelpCommand).describe(vec![
                "Lists every command by group.",
                "Pass a command name to see only that command.",
            ]),
            Command::new("Ping", &["ping"], "core", misc::PingCommand)
                .describe("Checks that the bot is responding."),
            Command::new("About", &["about", "info"], "core", misc::AboutCommand)
                .describe("Shows who runs the bot and how long it has been up."),
            Command::new("Modules", &["modules"], "core", misc::ModulesCommand)
                .describe("Lists the loaded modules."),
        ]
    }

    async fn start(&mut self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        let groups = ctx.commands.regroup();
        let title = ctx
            .config
            .bot
            .help
            .title
            .as_deref()
            .unwrap_or(crate::strings::help::DEFAULT_TITLE);
        tracing::info!(
            "Help index '{}' ready: {} commands in {} groups",
            title,
            ctx.commands.len(),
            groups.len()
        );
        Ok(())
    }
}
