//! # Commands
//!
//! Command descriptors and the registry that owns them.
//! The registry keeps registration order (help output follows it) and an alias index
//! for dispatch. Aliases are unique across the whole registry.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::bot::Bot;
use crate::domain::error::BotError;
use crate::domain::traits::ChatProvider;
use crate::domain::types::InboundMessage;

/// Everything a handler gets to see while it runs.
pub struct CommandContext<'a> {
    pub bot: &'a Bot,
    pub chat: &'a dyn ChatProvider,
    pub message: &'a InboundMessage,
    pub args: &'a [String],
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()>;
}

/// Help text of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
    #[default]
    Unavailable,
}

impl Description {
    /// Text for display; `None` when there is nothing to show.
    pub fn formatted(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Lines(lines) => Some(lines.join("\n")),
            Self::Unavailable => None,
        }
    }
}

impl From<serde_yaml::Value> for Description {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::String(text) => Self::Text(text),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(line) => Some(line),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map_or(Self::Unavailable, Self::Lines),
            _ => Self::Unavailable,
        }
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<&str>> for Description {
    fn from(lines: Vec<&str>) -> Self {
        Self::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Description,
    pub group: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        aliases: &[&str],
        group: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            description: Description::Unavailable,
            group: group.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn describe(mut self, description: impl Into<Description>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// Commands sharing a group label, in registration order.
#[derive(Debug)]
pub struct CommandGroup<'a> {
    pub name: &'a str,
    pub commands: Vec<&'a Command>,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_alias: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command. On error the registry is left untouched.
    pub fn register(&mut self, command: Command) -> Result<(), BotError> {
        self.check(&command)?;
        self.insert(command);
        Ok(())
    }

    /// Adds every command or none of them. Aliases must be unique against the
    /// registry and across the batch.
    pub fn register_all(&mut self, commands: Vec<Command>) -> Result<(), BotError> {
        let mut staged: HashMap<&str, &str> = HashMap::new();
        for command in &commands {
            self.check(command)?;
            for alias in &command.aliases {
                if let Some(existing) = staged.insert(alias.as_str(), command.name.as_str()) {
                    return Err(BotError::DuplicateAlias {
                        alias: alias.clone(),
                        command: command.name.clone(),
                        existing: existing.to_string(),
                    });
                }
            }
        }
        for command in commands {
            self.insert(command);
        }
        Ok(())
    }

    fn check(&self, command: &Command) -> Result<(), BotError> {
        if command.aliases.is_empty() || command.aliases.iter().any(|a| a.is_empty()) {
            return Err(BotError::InvalidCommand(command.name.clone()));
        }

        for (i, alias) in command.aliases.iter().enumerate() {
            let existing = if command.aliases[..i].contains(alias) {
                Some(command.name.clone())
            } else {
                self.by_alias
                    .get(alias)
                    .map(|&idx| self.commands[idx].name.clone())
            };
            if let Some(existing) = existing {
                return Err(BotError::DuplicateAlias {
                    alias: alias.clone(),
                    command: command.name.clone(),
                    existing,
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, command: Command) {
        let idx = self.commands.len();
        for alias in &command.aliases {
            self.by_alias.insert(alias.clone(), idx);
        }
        tracing::debug!("Registered command {} {:?}", command.name, command.aliases);
        self.commands.push(command);
    }

    /// Exact, case-sensitive alias lookup.
    pub fn find_by_alias(&self, token: &str) -> Option<&Command> {
        self.by_alias.get(token).map(|&idx| &self.commands[idx])
    }

    /// Partitions the registry by group, groups in order of first appearance.
    pub fn regroup(&self) -> Vec<CommandGroup<'_>> {
        let mut groups: Vec<CommandGroup<'_>> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for command in &self.commands {
            match positions.get(command.group.as_str()) {
                Some(&pos) => groups[pos].commands.push(command),
                None => {
                    positions.insert(&command.group, groups.len());
                    groups.push(CommandGroup {
                        name: &command.group,
                        commands: vec![command],
                    });
                }
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
