//! # Bot Client
//!
//! Owns the command and module registries, the transport and the optional database,
//! and drives `login`: connect to the database (if configured), initialise modules,
//! start modules, authenticate with the messaging platform. Every failure along the
//! way is fatal and returned to the caller.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use crate::application::commands::{CommandContext, CommandRegistry};
use crate::application::modules::{Module, ModuleContext, ModuleRegistry};
use crate::application::parsing::parse_invocation;
use crate::domain::config::AppConfig;
use crate::domain::error::BotError;
use crate::domain::traits::{ChatProvider, Database, DatabaseConnector, Transport};
use crate::domain::types::{InboundMessage, LoginState};
use crate::strings::logs;

const EVENT_CAPACITY: usize = 64;

/// Observable things that happen to the bot.
#[derive(Debug, Clone)]
pub enum BotEvent {
    StateChanged(LoginState),
    CommandFailed {
        command: String,
        room_id: String,
        sender: String,
        error: Arc<anyhow::Error>,
    },
}

/// What the dispatcher did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not addressed to the bot.
    Ignored,
    Unknown(String),
    Handled(String),
    Failed(String),
}

pub struct Bot {
    config: AppConfig,
    commands: CommandRegistry,
    modules: ModuleRegistry,
    transport: Box<dyn Transport>,
    connector: Option<Box<dyn DatabaseConnector>>,
    database: Option<Arc<dyn Database>>,
    state: LoginState,
    events: broadcast::Sender<BotEvent>,
    created_at: Instant,
}

impl Bot {
    pub fn new(config: AppConfig, transport: Box<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            commands: CommandRegistry::new(),
            modules: ModuleRegistry::new(),
            transport,
            connector: None,
            database: None,
            state: LoginState::Created,
            events,
            created_at: Instant::now(),
        }
    }

    pub fn with_database(mut self, connector: Box<dyn DatabaseConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Registers the module's static commands (all or none), then the module itself.
    pub fn load_module(&mut self, module: Box<dyn Module>) -> Result<(), BotError> {
        if self.state != LoginState::Created {
            return Err(BotError::InvalidState(self.state));
        }
        self.commands.register_all(module.commands())?;
        self.modules.register(module);
        Ok(())
    }

    /// Runs the full startup sequence and returns the transport session token.
    pub async fn login(&mut self, secret: &str) -> Result<String, BotError> {
        if self.state != LoginState::Created {
            return Err(BotError::InvalidState(self.state));
        }
        match self.run_login(secret).await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::error!("{}", logs::login_failed(&self.state.to_string(), &e.to_string()));
                self.transition(LoginState::Failed);
                Err(e)
            }
        }
    }

    async fn run_login(&mut self, secret: &str) -> Result<String, BotError> {
        if let Some(name) = self.config.bot.database.clone() {
            self.transition(LoginState::DatabaseConnecting);
            let connector =
                self.connector
                    .as_ref()
                    .ok_or_else(|| BotError::DatabaseConnection {
                        name: name.clone(),
                        source: logs::NO_DATABASE_BACKEND.into(),
                    })?;
            let database = connector
                .connect(&name)
                .await
                .map_err(|e| BotError::DatabaseConnection {
                    name: name.clone(),
                    source: e.into(),
                })?;
            tracing::info!("{}", logs::database_ready(&name));
            self.database = Some(database);
        }

        self.transition(LoginState::ModulesInitializing);
        {
            let mut ctx = ModuleContext {
                commands: &mut self.commands,
                config: &self.config,
                database: self.database.as_ref(),
            };
            self.modules.init(&mut ctx).await?;
        }

        self.transition(LoginState::ModulesStarting);
        {
            let mut ctx = ModuleContext {
                commands: &mut self.commands,
                config: &self.config,
                database: self.database.as_ref(),
            };
            self.modules.start(&mut ctx).await?;
        }

        self.transition(LoginState::AuthenticatingTransport);
        let token = self
            .transport
            .authenticate(secret)
            .await
            .map_err(|e| BotError::TransportAuth(e.into()))?;

        self.transition(LoginState::Online);
        Ok(token)
    }

    fn transition(&mut self, next: LoginState) {
        tracing::info!("{}", logs::state_transition(&self.state.to_string(), &next.to_string()));
        self.state = next;
        // No subscribers is fine.
        let _ = self.events.send(BotEvent::StateChanged(next));
    }

    /// Routes a chat message to its command. Handler errors never escape: they are
    /// logged and published as [`BotEvent::CommandFailed`].
    pub async fn handle_message(&self, chat: &dyn ChatProvider, message: &InboundMessage) -> Dispatch {
        let Some(invocation) = parse_invocation(&self.config.bot.prefix, &message.body) else {
            return Dispatch::Ignored;
        };

        let Some(command) = self.commands.find_by_alias(&invocation.alias) else {
            tracing::debug!("Unknown command '{}' from {}", invocation.alias, message.sender);
            return Dispatch::Unknown(invocation.alias);
        };

        tracing::info!(
            "Dispatching cmd='{}' args={:?} sender='{}'",
            command.name,
            invocation.args,
            message.sender
        );

        let ctx = CommandContext {
            bot: self,
            chat,
            message,
            args: &invocation.args,
        };
        let _ = chat.typing(true).await;
        let result = command.handler.run(ctx).await;
        let _ = chat.typing(false).await;

        match result {
            Ok(()) => Dispatch::Handled(command.name.clone()),
            Err(e) => {
                tracing::error!("{}", logs::command_failed(&command.name, &format!("{e:#}")));
                let _ = self.events.send(BotEvent::CommandFailed {
                    command: command.name.clone(),
                    room_id: message.room_id.clone(),
                    sender: message.sender.clone(),
                    error: Arc::new(e),
                });
                Dispatch::Failed(command.name.clone())
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BotEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn database(&self) -> Option<&Arc<dyn Database>> {
        self.database.as_ref()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::Command;
    use crate::application::testing::{
        EventLog, FailingHandler, FakeChat, FakeConnector, FakeTransport, Noop, RecordingModule,
        test_config,
    };
    use crate::domain::types::Phase;

    fn message(body: &str) -> InboundMessage {
        InboundMessage {
            room_id: "!room:example.org".to_string(),
            sender: "@alice:example.org".to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_without_database_never_connects() {
        let log = EventLog::default();
        let connector = FakeConnector::new(&log);
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)))
            .with_database(Box::new(connector));
        bot.load_module(Box::new(RecordingModule::new("m", &log))).unwrap();

        let token = bot.login("secret").await.unwrap();

        assert_eq!(token, "token-secret");
        assert_eq!(bot.state(), LoginState::Online);
        assert!(bot.database().is_none());
        assert_eq!(log.entries(), vec!["m:init", "m:start", "auth"]);
    }

    #[tokio::test]
    async fn test_login_order_with_database() {
        let log = EventLog::default();
        let mut config = test_config();
        config.bot.database = Some("tessera".to_string());
        let mut bot = Bot::new(config, Box::new(FakeTransport::new(&log)))
            .with_database(Box::new(FakeConnector::new(&log)));
        bot.load_module(Box::new(RecordingModule::new("a", &log))).unwrap();
        bot.load_module(Box::new(RecordingModule::new("b", &log))).unwrap();

        let mut events = bot.subscribe();
        bot.login("secret").await.unwrap();

        assert_eq!(
            log.entries(),
            vec!["connect:tessera", "a:init", "b:init", "a:start", "b:start", "auth"]
        );
        assert_eq!(bot.database().unwrap().name(), "tessera");

        let mut states = Vec::new();
        while let Ok(BotEvent::StateChanged(state)) = events.try_recv() {
            states.push(state);
        }
        assert_eq!(
            states,
            vec![
                LoginState::DatabaseConnecting,
                LoginState::ModulesInitializing,
                LoginState::ModulesStarting,
                LoginState::AuthenticatingTransport,
                LoginState::Online,
            ]
        );
    }

    #[tokio::test]
    async fn test_database_failure_is_fatal() {
        let log = EventLog::default();
        let mut config = test_config();
        config.bot.database = Some("tessera".to_string());
        let mut bot = Bot::new(config, Box::new(FakeTransport::new(&log)))
            .with_database(Box::new(FakeConnector::new(&log).failing()));
        bot.load_module(Box::new(RecordingModule::new("a", &log))).unwrap();

        let err = bot.login("secret").await.unwrap_err();

        assert!(matches!(err, BotError::DatabaseConnection { ref name, .. } if name == "tessera"));
        assert_eq!(bot.state(), LoginState::Failed);
        assert_eq!(log.entries(), vec!["connect:tessera"]);
    }

    #[tokio::test]
    async fn test_configured_database_without_connector() {
        let log = EventLog::default();
        let mut config = test_config();
        config.bot.database = Some("tessera".to_string());
        let mut bot = Bot::new(config, Box::new(FakeTransport::new(&log)));

        let err = bot.login("secret").await.unwrap_err();
        assert!(matches!(err, BotError::DatabaseConnection { .. }));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_init_failure_skips_start_and_auth() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        bot.load_module(Box::new(RecordingModule::new("a", &log).fail_on(Phase::Init)))
            .unwrap();
        bot.load_module(Box::new(RecordingModule::new("b", &log))).unwrap();

        let err = bot.login("secret").await.unwrap_err();

        assert!(matches!(err, BotError::ModuleLifecycle { .. }));
        assert_eq!(bot.state(), LoginState::Failed);
        assert_eq!(log.entries(), vec!["a:init"]);
    }

    #[tokio::test]
    async fn test_start_failure_skips_auth() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        bot.load_module(Box::new(RecordingModule::new("a", &log)))
            .unwrap();
        bot.load_module(Box::new(RecordingModule::new("b", &log).fail_on(Phase::Start)))
            .unwrap();

        let err = bot.login("secret").await.unwrap_err();

        assert!(matches!(
            err,
            BotError::ModuleLifecycle { ref module, phase: Phase::Start, .. } if module == "b"
        ));
        assert_eq!(bot.state(), LoginState::Failed);
        assert_eq!(log.entries(), vec!["a:init", "b:init", "a:start", "b:start"]);
        assert!(!log.entries().contains(&"auth".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log).failing()));

        let err = bot.login("secret").await.unwrap_err();
        assert!(matches!(err, BotError::TransportAuth(_)));
        assert_eq!(bot.state(), LoginState::Failed);
    }

    #[tokio::test]
    async fn test_login_only_once() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        bot.login("secret").await.unwrap();

        assert!(matches!(
            bot.login("secret").await,
            Err(BotError::InvalidState(LoginState::Online))
        ));
        assert!(matches!(
            bot.load_module(Box::new(RecordingModule::new("late", &log))),
            Err(BotError::InvalidState(LoginState::Online))
        ));
    }

    #[tokio::test]
    async fn test_load_module_rejects_alias_clash() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        let first = RecordingModule::new("a", &log)
            .with_command(Command::new("Ping", &["ping"], "util", Noop));
        let second = RecordingModule::new("b", &log)
            .with_command(Command::new("Pong", &["ping"], "util", Noop));

        bot.load_module(Box::new(first)).unwrap();
        assert!(matches!(
            bot.load_module(Box::new(second)),
            Err(BotError::DuplicateAlias { .. })
        ));
        assert_eq!(bot.modules().names(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_rejected_module_leaves_no_commands() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        let first = RecordingModule::new("a", &log)
            .with_command(Command::new("Ping", &["ping"], "util", Noop));
        let second = RecordingModule::new("b", &log)
            .with_command(Command::new("Zap", &["z"], "util", Noop))
            .with_command(Command::new("Pong", &["ping"], "util", Noop));

        bot.load_module(Box::new(first)).unwrap();
        assert!(bot.load_module(Box::new(second)).is_err());
        assert_eq!(bot.modules().names(), vec!["a"]);
        assert_eq!(bot.commands().len(), 1);

        bot.login("secret").await.unwrap();
        let chat = FakeChat::default();
        assert_eq!(
            bot.handle_message(&chat, &message("!z")).await,
            Dispatch::Unknown("z".to_string())
        );
    }

    #[tokio::test]
    async fn test_dispatch_outcomes() {
        let log = EventLog::default();
        let mut bot = Bot::new(test_config(), Box::new(FakeTransport::new(&log)));
        let module = RecordingModule::new("a", &log)
            .with_command(Command::new("Ping", &["ping", "p"], "util", Noop))
            .with_command(Command::new("Boom", &["boom"], "util", FailingHandler));
        bot.load_module(Box::new(module)).unwrap();
        bot.login("secret").await.unwrap();

        let chat = FakeChat::default();
        assert_eq!(bot.handle_message(&chat, &message("hello")).await, Dispatch::Ignored);
        assert_eq!(bot.handle_message(&chat, &message("!")).await, Dispatch::Ignored);
        assert_eq!(
            bot.handle_message(&chat, &message("!nope")).await,
            Dispatch::Unknown("nope".to_string())
        );
        assert_eq!(
            bot.handle_message(&chat, &message("!p")).await,
            Dispatch::Handled("Ping".to_string())
        );

        let mut events = bot.subscribe();
        assert_eq!(
            bot.handle_message(&chat, &message("!boom now")).await,
            Dispatch::Failed("Boom".to_string())
        );
        match events.try_recv().unwrap() {
            BotEvent::CommandFailed {
                command,
                room_id,
                sender,
                error,
            } => {
                assert_eq!(command, "Boom");
                assert_eq!(room_id, "!room:example.org");
                assert_eq!(sender, "@alice:example.org");
                assert!(error.to_string().contains("boom"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(bot.state(), LoginState::Online);
        assert_eq!(chat.typing_changes(), vec![true, false, true, false]);
    }
}
