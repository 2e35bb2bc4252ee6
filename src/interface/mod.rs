//! # Interface Layer
//!
//! The modules and command handlers users interact with.

pub mod commands;
