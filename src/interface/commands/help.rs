//! # Help Command
//!
//! Handles the `help` command.
//! Without arguments lists every group; with an alias shows that one command.
//! An unknown alias produces no reply.

use crate::application::commands::{CommandContext, CommandHandler};
use crate::application::help;
use anyhow::Result;
use async_trait::async_trait;

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let pages = help::assemble(ctx.bot.commands(), ctx.args);
        if pages.is_empty() {
            return Ok(());
        }
        let config = &ctx.bot.config().bot;
        let text = help::render(&pages, &config.help, &config.prefix);
        ctx.chat.send_message(&text).await?;
        Ok(())
    }
}
