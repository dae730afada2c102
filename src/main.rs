use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use reelchi::cli::{Cli, Commands};
use reelchi::core::{config, init_logger};
use reelchi::instagram::InstagramClient;
use reelchi::storage::create_pool;
use reelchi::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from inside the dispatcher instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::InitDb) => {
            create_pool(&config::DATABASE_PATH)?;
            log::info!("Database ready at {}", config::DATABASE_PATH.as_str());
            Ok(())
        }
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Run the Telegram bot
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let bot = create_bot()?;

    let bot_info = bot.get_me().await?;
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username.as_deref(), bot_info.id);

    setup_bot_commands(&bot).await?;

    // Create database connection pool (runs migrations)
    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);

    let instagram = Arc::new(InstagramClient::new());

    if config::admin::ADMIN_IDS.is_empty() {
        log::warn!("ADMIN_IDS is not set; /stats, /logs and /links will refuse everyone");
    }

    // Create handler dependencies and the dispatcher handler tree
    let handler_deps = HandlerDeps::new(Arc::clone(&db_pool), Arc::clone(&instagram));
    let handler = schema(handler_deps);

    log::info!("Starting bot in long polling mode");

    Dispatcher::builder(bot, handler)
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
