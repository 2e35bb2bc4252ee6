//! # Help Assembly
//!
//! Builds help pages from the command registry: one page per group, or a single
//! page for one looked-up command. Rendering to Markdown lives here too since the
//! only consumer is the chat.

use crate::application::commands::{Command, CommandRegistry};
use crate::domain::config::HelpConfig;
use crate::strings::help;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage {
    pub title: String,
    pub entries: Vec<HelpEntry>,
}

impl From<&Command> for HelpEntry {
    fn from(command: &Command) -> Self {
        Self {
            name: command.name.clone(),
            description: command
                .description
                .formatted()
                .unwrap_or_else(|| help::DESCRIPTION_UNAVAILABLE.to_string()),
            aliases: command.aliases.clone(),
        }
    }
}

/// No arguments: every group. Otherwise the first argument names one command;
/// an unknown alias yields no pages.
pub fn assemble(commands: &CommandRegistry, args: &[String]) -> Vec<HelpPage> {
    match args.first() {
        None => commands
            .regroup()
            .into_iter()
            .map(|group| HelpPage {
                title: group.name.to_string(),
                entries: group.commands.into_iter().map(HelpEntry::from).collect(),
            })
            .collect(),
        Some(token) => commands
            .find_by_alias(token)
            .map(|command| HelpPage {
                title: command.name.clone(),
                entries: vec![HelpEntry::from(command)],
            })
            .into_iter()
            .collect(),
    }
}

pub fn render(pages: &[HelpPage], settings: &HelpConfig, prefix: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "**{}**\n",
        settings.title.as_deref().unwrap_or(help::DEFAULT_TITLE)
    ));
    if let Some(description) = &settings.description {
        out.push_str(description);
        out.push('\n');
    }
    out.push_str(&help::usage(prefix));

    for page in pages {
        out.push_str(&format!("\n**{}**\n", page.title));
        for entry in &page.entries {
            let aliases: Vec<String> = entry
                .aliases
                .iter()
                .map(|a| format!("`{prefix}{a}`"))
                .collect();
            out.push_str(&format!("* {} ({})\n", entry.name, aliases.join(", ")));
            for line in entry.description.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }
    out
}
