//! Reelchi - Telegram bot that fetches Instagram posts and reels
//!
//! Users send an Instagram post/reel link; the bot resolves the media and
//! caption through Instagram's GraphQL API, replies with the media followed
//! by the parsed caption, and appends a usage log row. Admins can query
//! aggregate statistics and recent activity.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, and text helpers
//! - `instagram`: media resolution via the GraphQL API
//! - `storage`: activity log database and migrations
//! - `telegram`: bot integration and handlers

pub mod cli;
pub mod core;
pub mod instagram;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::instagram::InstagramClient;
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
pub use crate::telegram::{handle_message, schema, HandlerDeps};
