//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix service, the optional database, and the bot itself
//! (prefix, developer contact, help texts and module selection).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

impl AppConfig {
    /// Reads and parses a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1/".to_string()
}

/// Bot-level settings: how commands are invoked and which modules are loaded.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub developer: DeveloperConfig,
    /// Database name. When absent the bot never connects to a database.
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub help: HelpConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            locale: default_locale(),
            developer: DeveloperConfig::default(),
            database: None,
            help: HelpConfig::default(),
            modules: ModulesConfig::default(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

/// Who runs the bot and where failures get reported.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct DeveloperConfig {
    /// Support space (Matrix space room id) advertised by `about`.
    #[serde(default)]
    pub guild: Option<String>,
    /// Room id that receives command failure reports.
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct HelpConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ModulesConfig {
    /// Directory scanned for scripted (YAML) modules.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub default: ModuleSelection,
}

/// Which built-in modules to load: `"*"` or an explicit list of names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawSelection")]
pub enum ModuleSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl ModuleSelection {
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Wildcard(String),
    List(Vec<String>),
}

impl TryFrom<RawSelection> for ModuleSelection {
    type Error = String;

    fn try_from(raw: RawSelection) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSelection::Wildcard(s) if s == "*" => Ok(Self::All),
            RawSelection::Wildcard(s) => Err(format!(
                "module selection must be \"*\" or a list of names, got {s:?}"
            )),
            RawSelection::List(names) => Ok(Self::Only(names)),
        }
    }
}
