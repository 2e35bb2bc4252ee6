//! # Help Text
//!
//! Fixed pieces of the help output. Command descriptions come from the registry.

pub const DEFAULT_TITLE: &str = "🤖 Tessera Help";

pub const DESCRIPTION_UNAVAILABLE: &str = "Description unavailable.";

pub fn usage(prefix: &str) -> String {
    format!("Use `{prefix}help <command>` for details on one command.\n")
}
