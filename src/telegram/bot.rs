//! Bot initialization and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
///
/// `/logs` takes an optional numeric argument and is routed by a text
/// filter in the dispatcher schema instead of this enum.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Mavjud buyruqlar:")]
pub enum Command {
    #[command(description = "botni boshlash")]
    Start,
    #[command(description = "yordam")]
    Help,
    #[command(description = "umumiy statistika (faqat adminlar)")]
    Stats,
    #[command(description = "oxirgi linklar (faqat adminlar)")]
    Links,
}

/// Creates a Bot instance from the configured token
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or HTTP client build failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN (or TELOXIDE_TOKEN) environment variable is not set"));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "botni boshlash"),
        BotCommand::new("help", "yordam"),
        BotCommand::new("stats", "umumiy statistika (faqat adminlar)"),
        BotCommand::new("logs", "oxirgi loglar (faqat adminlar)"),
        BotCommand::new("links", "oxirgi linklar (faqat adminlar)"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        assert!(command_list.contains("Mavjud buyruqlar"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("stats"));
        assert!(command_list.contains("links"));
    }
}
