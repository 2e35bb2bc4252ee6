//! # Application Layer
//!
//! Contains the core logic of the bot: the command and module registries, the bot
//! client with its login sequence and dispatcher, help assembly and error reporting.

pub mod bot;
pub mod commands;
pub mod help;
pub mod logging;
pub mod modules;
pub mod parsing;

#[cfg(test)]
pub mod testing;
