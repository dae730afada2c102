//! Telegram bot integration and handlers

pub mod admin;
pub mod bot;
pub mod commands;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use commands::handle_message;
pub use handlers::{schema, HandlerDeps, HandlerError};
