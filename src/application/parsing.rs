//! # Parsing Utils
//!
//! Splits a chat message into a command alias and its arguments.
//! Arguments are whitespace separated; a double-quoted span counts as one argument.

use regex::Regex;
use std::sync::LazyLock;

static ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("argument pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub alias: String,
    pub args: Vec<String>,
}

/// Returns `None` when `body` is not a command for this prefix.
pub fn parse_invocation(prefix: &str, body: &str) -> Option<Invocation> {
    let rest = body.trim_start().strip_prefix(prefix)?;
    // "! ping" is not a command.
    if rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = rest.splitn(2, char::is_whitespace);
    let alias = parts.next().filter(|a| !a.is_empty())?;
    let args = parts.next().map(split_arguments).unwrap_or_default();

    Some(Invocation {
        alias: alias.to_string(),
        args,
    })
}

pub fn split_arguments(input: &str) -> Vec<String> {
    ARGUMENT
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
