//! # Scripted Modules
//!
//! Modules declared in YAML files inside the configured module directory:
//!
//! ```yaml
//! name: greetings
//! commands:
//!   - name: Hello
//!     alias: [hello, hi]
//!     description: Says hello
//!     group: fun
//!     reply: "Hello {sender}! You said: {args}"
//! ```
//!
//! Each file becomes one module whose commands are registered during `init`.

use crate::application::commands::{Command, CommandContext, CommandHandler, Description};
use crate::application::modules::{Module, ModuleContext};
use crate::strings::logs;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ModuleFile {
    name: String,
    #[serde(default)]
    commands: Vec<ScriptedCommand>,
}

#[derive(Debug, Deserialize)]
struct ScriptedCommand {
    name: String,
    alias: Vec<String>,
    #[serde(default)]
    description: Description,
    #[serde(default = "default_group")]
    group: String,
    reply: String,
}

fn default_group() -> String {
    "custom".to_string()
}

#[derive(Debug)]
pub struct ScriptedModule {
    file: ModuleFile,
}

impl ScriptedModule {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self {
            file: serde_yaml::from_str(content)?,
        })
    }
}

/// Reads every `.yaml`/`.yml` file in `dir`, in file name order.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<ScriptedModule>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if path.is_file() && is_yaml {
            paths.push(path);
        }
    }
    paths.sort();

    let mut modules = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let module = ScriptedModule::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!(
            "{}",
            logs::scripted_module_loaded(&module.file.name, &path.display().to_string())
        );
        modules.push(module);
    }
    Ok(modules)
}

#[async_trait]
impl Module for ScriptedModule {
    fn name(&self) -> &str {
        &self.file.name
    }

    async fn init(&mut self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        for command in &self.file.commands {
            ctx.commands.register(Command {
                name: command.name.clone(),
                aliases: command.alias.clone(),
                description: command.description.clone(),
                group: command.group.clone(),
                handler: Arc::new(Reply(command.reply.clone())),
            })?;
        }
        Ok(())
    }
}

struct Reply(String);

#[async_trait]
impl CommandHandler for Reply {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let text = self
            .0
            .replace("{sender}", &ctx.message.sender)
            .replace("{args}", &ctx.args.join(" "));
        ctx.chat.send_message(&text).await?;
        Ok(())
    }
}
