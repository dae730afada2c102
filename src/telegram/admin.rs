//! Admin functionality for the Telegram bot
//!
//! This module contains the admin gate and the admin-only commands:
//! - /stats: aggregate usage statistics
//! - /logs: recent activity log rows (optional limit argument)
//! - /links: recently submitted distinct links

use teloxide::prelude::*;

use crate::core::config;
use crate::core::config::admin::ADMIN_IDS;
use crate::core::error::AppResult;
use crate::storage::db::{self, DbPool};

/// Maximum message length for Telegram (with margin)
const MAX_MESSAGE_LENGTH: usize = 4000;

const NOT_ADMIN_MESSAGE: &str = "❌ Bu buyruq faqat adminlarga mo‘ljallangan.";

/// Check if user is admin
pub fn is_admin(user_id: i64) -> bool {
    ADMIN_IDS.contains(&user_id)
}

fn truncate_message(text: &str) -> String {
    if text.len() <= MAX_MESSAGE_LENGTH {
        return text.to_string();
    }
    let mut trimmed = text.chars().take(MAX_MESSAGE_LENGTH - 20).collect::<String>();
    trimmed.push_str("\n... (truncated)");
    trimmed
}

/// Parse the numeric argument of `/logs [limit]`.
///
/// Missing or non-numeric arguments fall back to the default; values above
/// the cap are clamped.
pub(crate) fn parse_logs_limit(message_text: &str) -> i64 {
    let arg = message_text
        .strip_prefix("/logs")
        .unwrap_or(message_text)
        .split_whitespace()
        .next();

    match arg.and_then(|a| a.parse::<i64>().ok()) {
        Some(n) if n >= 0 => n.min(config::logs::MAX_LIMIT),
        _ => config::logs::DEFAULT_LIMIT,
    }
}

/// Handle /stats command - aggregate usage statistics (admin only)
pub async fn handle_stats_command(bot: &Bot, chat_id: ChatId, user_id: i64, db_pool: &DbPool) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_ADMIN_MESSAGE).await?;
        return Ok(());
    }

    let conn = db::get_connection(db_pool)?;
    let stats = db::get_stats(&conn)?;

    let mut text = format!(
        "📊 Statistika\nUmumiy linklar: {}\nFoydalanuvchi soni: {}\n\nTop yuboruvchilar:\n",
        stats.total_links, stats.unique_users
    );
    for top in &stats.top_submitters {
        let who = if !top.first_name.is_empty() {
            top.first_name.clone()
        } else if !top.username.is_empty() {
            top.username.clone()
        } else {
            top.user_id.to_string()
        };
        text.push_str(&format!("- {} ({}) : {}\n", who, top.username, top.count));
    }

    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Handle /logs command - recent activity log rows (admin only)
///
/// `message_text` is the full command text, e.g. `/logs 100`.
pub async fn handle_logs_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    message_text: &str,
    db_pool: &DbPool,
) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_ADMIN_MESSAGE).await?;
        return Ok(());
    }

    let limit = parse_logs_limit(message_text);
    let conn = db::get_connection(db_pool)?;
    let rows = db::get_logs(&conn, limit)?;

    if rows.is_empty() {
        bot.send_message(chat_id, "Logs mavjud emas.").await?;
        return Ok(());
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|r| {
            let who = if !r.username.is_empty() {
                r.username.clone()
            } else {
                r.user_id.to_string()
            };
            format!("[{}] {} ({}) → {}", r.created_at, r.first_name, who, r.link)
        })
        .collect();

    bot.send_message(chat_id, truncate_message(&lines.join("\n"))).await?;
    Ok(())
}

/// Handle /links command - recently submitted distinct links (admin only)
pub async fn handle_links_command(bot: &Bot, chat_id: ChatId, user_id: i64, db_pool: &DbPool) -> AppResult<()> {
    if !is_admin(user_id) {
        bot.send_message(chat_id, NOT_ADMIN_MESSAGE).await?;
        return Ok(());
    }

    let conn = db::get_connection(db_pool)?;
    let links = db::get_links(&conn, config::logs::LINKS_LIMIT)?;

    if links.is_empty() {
        bot.send_message(chat_id, "Linklar mavjud emas.").await?;
        return Ok(());
    }

    bot.send_message(chat_id, truncate_message(&links.join("\n"))).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_logs_limit_default() {
        assert_eq!(parse_logs_limit("/logs"), config::logs::DEFAULT_LIMIT);
        assert_eq!(parse_logs_limit("/logs "), config::logs::DEFAULT_LIMIT);
        assert_eq!(parse_logs_limit("/logs abc"), config::logs::DEFAULT_LIMIT);
    }

    #[test]
    fn test_parse_logs_limit_numeric() {
        assert_eq!(parse_logs_limit("/logs 100"), 100);
        assert_eq!(parse_logs_limit("/logs 0"), 0);
    }

    #[test]
    fn test_parse_logs_limit_clamped() {
        assert_eq!(parse_logs_limit("/logs 9999"), config::logs::MAX_LIMIT);
        assert_eq!(parse_logs_limit("/logs -5"), config::logs::DEFAULT_LIMIT);
    }

    #[test]
    fn test_truncate_message_short() {
        assert_eq!(truncate_message("hello"), "hello");
    }

    #[test]
    fn test_truncate_message_long() {
        let long = "x".repeat(MAX_MESSAGE_LENGTH + 100);
        let truncated = truncate_message(&long);
        assert!(truncated.len() <= MAX_MESSAGE_LENGTH);
        assert!(truncated.ends_with("... (truncated)"));
    }
}
