//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.

pub const PONG: &str = "🏓 Pong!";

pub fn about(developer: &str, locale: &str, uptime: &str, modules: usize, commands: usize) -> String {
    format!(
        "**🤖 Tessera**\n* Developer: {developer}\n* Locale: {locale}\n* Uptime: {uptime}\n* {modules} modules, {commands} commands"
    )
}

pub fn support_space(space: &str) -> String {
    format!("* Support: {space}")
}

pub const UNKNOWN_DEVELOPER: &str = "unknown";

pub fn loaded_modules(names: &[&str]) -> String {
    format!("**📦 Modules**\n{}", names.iter().map(|n| format!("* {n}")).collect::<Vec<_>>().join("\n"))
}

pub const REMEMBER_USAGE: &str = "Usage: `remember <key> <text>`";
pub const RECALL_USAGE: &str = "Usage: `recall <key>`";

pub fn remembered(key: &str) -> String {
    format!("📝 Remembered `{key}`.")
}

pub fn recalled(key: &str, text: &str, author: &str) -> String {
    format!("📝 `{key}` ({author}):\n{text}")
}

pub fn nothing_remembered(key: &str) -> String {
    format!("Nothing remembered for `{key}`.")
}

pub fn command_failure_report(timestamp: &str, command: &str, room: &str, sender: &str, err: &str) -> String {
    format!("`[{timestamp}]` ⚠️ **{command}** failed in {room} (sent by {sender}): {err}")
}
