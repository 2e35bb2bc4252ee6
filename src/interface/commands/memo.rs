//! # Memo Module
//!
//! `remember <key> <text>` and `recall <key>`, stored per room in the database.
//! Each room has one document in `memos`, keyed by the room id, mapping memo keys to memos.
//! The commands are only registered when the bot has a database.

use crate::application::commands::{Command, CommandContext, CommandHandler};
use crate::application::modules::{Module, ModuleContext};
use crate::domain::traits::Database;
use crate::strings::{logs, messages};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const COLLECTION: &str = "memos";
const GROUP: &str = "memo";

#[derive(Debug, Serialize, Deserialize)]
struct Memo {
    text: String,
    author: String,
    saved_at: String,
}

type RoomMemos = BTreeMap<String, Memo>;

async fn load_room(db: &dyn Database, room_id: &str) -> Result<RoomMemos> {
    match db.load(COLLECTION, room_id).await? {
        Some(doc) => Ok(serde_json::from_value(doc)?),
        None => Ok(RoomMemos::new()),
    }
}

pub struct MemoModule;

#[async_trait]
impl Module for MemoModule {
    fn name(&self) -> &str {
        "memo"
    }

    async fn init(&mut self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        let Some(db) = ctx.database else {
            tracing::warn!("{}", logs::MEMO_NO_DATABASE);
            return Ok(());
        };
        ctx.commands.register(
            Command::new("Remember", &["remember"], GROUP, Remember { db: db.clone() })
                .describe("Stores a note for this room under a key."),
        )?;
        ctx.commands.register(
            Command::new("Recall", &["recall"], GROUP, Recall { db: db.clone() })
                .describe("Shows the note stored under a key."),
        )?;
        Ok(())
    }
}

struct Remember {
    db: Arc<dyn Database>,
}

#[async_trait]
impl CommandHandler for Remember {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let [key, words @ ..] = ctx.args else {
            ctx.chat.send_notification(messages::REMEMBER_USAGE).await?;
            return Ok(());
        };
        if words.is_empty() {
            ctx.chat.send_notification(messages::REMEMBER_USAGE).await?;
            return Ok(());
        }

        let memo = Memo {
            text: words.join(" "),
            author: ctx.message.sender.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        };
        let room_id = &ctx.message.room_id;
        let mut memos = load_room(self.db.as_ref(), room_id).await?;
        memos.insert(key.clone(), memo);
        self.db
            .store(COLLECTION, room_id, serde_json::to_value(&memos)?)
            .await?;
        ctx.chat.send_message(&messages::remembered(key)).await?;
        Ok(())
    }
}

struct Recall {
    db: Arc<dyn Database>,
}

#[async_trait]
impl CommandHandler for Recall {
    async fn run(&self, ctx: CommandContext<'_>) -> Result<()> {
        let Some(key) = ctx.args.first() else {
            ctx.chat.send_notification(messages::RECALL_USAGE).await?;
            return Ok(());
        };

        let memos = load_room(self.db.as_ref(), &ctx.message.room_id).await?;
        let reply = match memos.get(key) {
            Some(memo) => messages::recalled(key, &memo.text, &memo.author),
            None => messages::nothing_remembered(key),
        };
        ctx.chat.send_message(&reply).await?;
        Ok(())
    }
}
