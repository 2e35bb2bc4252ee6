//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: Configuration, Types and Traits
//! - Infrastructure: Matrix, Redis
//! - Application: Bot client, Registries, Help, Error reporting
//! - Interface: Built-in and scripted modules
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::application::bot::Bot;
use crate::application::logging::ErrorReporter;
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::InboundMessage;
use crate::infrastructure::matrix::{MatrixService, MatrixTransport, RoomChannel};
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(version, about = "Modular Matrix chat bot")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Directory for the session log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = init_logging(&cli.data_dir)?;
    tracing::info!("{}", logs::STARTING);
    tracing::info!("{}", logs::config_loaded(&config.services.matrix.username));

    // 3. Bot Setup
    let transport = MatrixTransport::connect(&config.services.matrix).await?;
    let client = transport.client();

    let bot = Bot::new(config.clone(), Box::new(transport));
    #[cfg(feature = "redis")]
    let bot = bot.with_database(Box::new(
        crate::infrastructure::database::RedisConnector::new(&config.services.redis.url),
    ));
    let mut bot = bot;

    crate::interface::commands::load_all(&mut bot, &config.bot.modules)?;

    // 4. Error Reporting (subscribe before login so nothing is missed)
    let mut reporter: ErrorReporter<dyn ChatProvider> = ErrorReporter::new();
    if let Some(channel) = &config.bot.developer.channel {
        reporter = reporter.with_chat(Arc::new(RoomChannel::new(client.clone(), channel)?));
    }
    tokio::spawn(reporter.run(bot.subscribe()));

    // 5. Login: database -> module init -> module start -> Matrix
    bot.login(&config.services.matrix.password).await?;
    tracing::info!("Bot is {}", bot.state());
    let bot = Arc::new(bot);

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();
    let loop_bot = bot.clone();
    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let bot = loop_bot.clone();
        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time = std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                if original_msg.sender == room.own_user_id() {
                    return;
                }
                let chat = MatrixService::new(room);
                let message = InboundMessage {
                    room_id: chat.room_id(),
                    sender: original_msg.sender.to_string(),
                    body: text_content.body.clone(),
                };
                bot.handle_message(&chat, &message).await;
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::warn!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    // 7. Sync until shutdown
    tracing::info!("{}", logs::SYNC_LOOP_START);
    tokio::select! {
        res = client.sync(SyncSettings::default()) => {
            if let Err(e) = res {
                tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
                return Err(e.into());
            }
        }
        res = tokio::signal::ctrl_c() => {
            match res {
                Ok(()) => tracing::info!("{}", logs::SHUTDOWN),
                Err(e) => tracing::error!("{}", logs::shutdown_fail(&e.to_string())),
            }
        }
    }

    Ok(())
}

/// Console plus `session.log` in `data_dir`, cleared on every start.
fn init_logging(data_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    if !data_dir.exists() {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    }

    let log_path = data_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(data_dir, "session.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}
