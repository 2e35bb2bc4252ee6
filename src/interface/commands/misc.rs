//! # Miscellaneous Commands
//!
//! Handles `ping`, `about` and `modules`.

use crate::application::commands::{CommandContext, CommandHandler};
use crate::strings::messages;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        ctx.chat.send_message(messages::PONG).await?;
        Ok(())
    }
}

pub struct AboutCommand;

#[async_trait]
impl CommandHandler for AboutCommand {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let bot = ctx.bot;
        let config = &bot.config().bot;
        let mut msg = messages::about(
            config
                .developer
                .name
                .as_deref()
                .unwrap_or(messages::UNKNOWN_DEVELOPER),
            &config.locale,
            &format_uptime(bot.uptime()),
            bot.modules().len(),
            bot.commands().len(),
        );
        if let Some(space) = &config.developer.guild {
            msg.push('\n');
            msg.push_str(&messages::support_space(space));
        }
        ctx.chat.send_message(&msg).await?;
        Ok(())
    }
}

pub struct ModulesCommand;

#[async_trait]
impl CommandHandler for ModulesCommand {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let names = ctx.bot.modules().names();
        ctx.chat.send_message(&messages::loaded_modules(&names)).await?;
        Ok(())
    }
}

pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (days, hours, minutes, seconds) = (secs / 86_400, secs / 3_600 % 24, secs / 60 % 60, secs % 60);
    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    }
}
