//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, Transport, Database).

#[cfg(feature = "redis")]
pub mod database;
pub mod matrix;
