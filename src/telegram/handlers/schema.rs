//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::admin::{handle_links_command, handle_logs_command, handle_stats_command};
use crate::telegram::bot::Command;
use crate::telegram::commands::{handle_help_command, handle_message, handle_start_command};

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_logs = deps.clone();
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();

    dptree::entry()
        // /logs takes an optional argument, so it is matched on raw text
        .branch(logs_handler(deps_logs))
        // Command handler
        .branch(command_handler(deps_commands))
        // Message handler for submitted links
        .branch(message_handler(deps_messages))
}

fn user_id_of(msg: &Message) -> i64 {
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0)
}

/// Handler for /logs admin command (argument-taking, not in Command enum)
fn logs_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(|text| text.starts_with("/logs")).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let user_id = user_id_of(&msg);
                let message_text = msg.text().unwrap_or_default();

                if let Err(e) = handle_logs_command(&bot, msg.chat.id, user_id, message_text, &deps.db_pool).await {
                    log::error!("/logs handler failed for user {}: {}", user_id, e);
                }
                Ok(())
            }
        })
}

/// Handler for bot commands (/start, /help, /stats, /links)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
                let user_id = user_id_of(&msg);

                let result = match cmd {
                    Command::Start => handle_start_command(&bot, msg.chat.id).await,
                    Command::Help => handle_help_command(&bot, msg.chat.id, user_id).await,
                    Command::Stats => handle_stats_command(&bot, msg.chat.id, user_id, &deps.db_pool).await,
                    Command::Links => handle_links_command(&bot, msg.chat.id, user_id, &deps.db_pool).await,
                };

                if let Err(e) = result {
                    log::error!("Command {:?} failed for user {}: {}", cmd, user_id, e);
                }
                Ok(())
            }
        },
    ))
}

/// Handler for regular messages (submitted links)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            if let Err(err) = handle_message(&bot, &msg, &deps).await {
                log::error!("Error handling message: {:?}", err);
            }
            Ok(())
        }
    })
}
