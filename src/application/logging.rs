//! # Error Reporting
//!
//! Consumes bot events: state changes go to the tracing log, command failures are
//! logged and, when a developer channel is attached, posted there as well.

use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::application::bot::BotEvent;
use crate::domain::traits::ChatProvider;
use crate::strings::{logs, messages};

pub struct ErrorReporter<CP: ChatProvider + ?Sized> {
    chat: Option<Arc<CP>>,
}

impl<CP: ChatProvider + ?Sized> Default for ErrorReporter<CP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<CP: ChatProvider + ?Sized> ErrorReporter<CP> {
    pub fn new() -> Self {
        Self { chat: None }
    }

    pub fn with_chat(mut self, provider: Arc<CP>) -> Self {
        self.chat = Some(provider);
        self
    }

    /// Runs until every sender of `events` is gone.
    pub async fn run(self, mut events: Receiver<BotEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.report(&event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("{}", logs::events_lagged(skipped));
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub async fn report(&self, event: &BotEvent) {
        match event {
            BotEvent::StateChanged(state) => tracing::debug!("Bot is now {}", state),
            BotEvent::CommandFailed {
                command,
                room_id,
                sender,
                error,
            } => {
                let err = format!("{:#}", error);
                tracing::warn!("{} in {} by {}: {}", command, room_id, sender, err);

                if let Some(chat) = &self.chat {
                    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                    let report =
                        messages::command_failure_report(&timestamp, command, room_id, sender, &err);
                    if let Err(e) = chat.send_notification(&report).await {
                        tracing::error!("{}", logs::report_failed(&e.to_string()));
                    }
                }
            }
        }
    }
}
