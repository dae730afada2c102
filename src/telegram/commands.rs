//! Incoming message flow: link extraction, media resolution, activity
//! logging, and replies.
//!
//! The whole submission is handled in one place: any resolver, database,
//! or send failure is surfaced by editing the "please wait" status message
//! to the error text. Nothing is retried.

use teloxide::prelude::*;
use teloxide::types::InputFile;
use url::Url;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::utils::{extract_first_url, extract_hashtags, extract_mentions};
use crate::instagram::MediaKind;
use crate::storage::db;
use crate::telegram::admin::is_admin;
use crate::telegram::handlers::HandlerDeps;

const SEND_LINK_MESSAGE: &str = "Iltimos, Instagram post yoki reel linkini yuboring.";

/// Handle /start command
pub async fn handle_start_command(bot: &Bot, chat_id: ChatId) -> AppResult<()> {
    bot.send_message(
        chat_id,
        "👋 Salom! Instagram link yuboring (post yoki reel). Men avval media — keyin caption yuboraman.",
    )
    .await?;
    Ok(())
}

/// Handle /help command
///
/// The admin command section is only shown to admins.
pub async fn handle_help_command(bot: &Bot, chat_id: ChatId, user_id: i64) -> AppResult<()> {
    let mut help_text = String::from("/start - Botni boshlash\n/help - Yordam\n");
    if is_admin(user_id) {
        help_text.push_str(
            "\n--- Admin komandalar ---\n\
             /stats - Umumiy statistika\n\
             /logs - Oxirgi loglar\n\
             /links - Oxirgi linklar\n",
        );
    }
    bot.send_message(chat_id, help_text).await?;
    Ok(())
}

/// Handle an incoming text message: extract the first URL, resolve it,
/// log the submission, and reply with media followed by the caption.
pub async fn handle_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let text = match msg.text() {
        Some(t) => t.trim(),
        None => {
            bot.send_message(msg.chat.id, SEND_LINK_MESSAGE).await?;
            return Ok(());
        }
    };

    // Commands are routed by their own dispatcher branches
    if text.starts_with('/') {
        return Ok(());
    }

    let url_text = match extract_first_url(text) {
        Some(u) => u,
        None => {
            bot.send_message(msg.chat.id, SEND_LINK_MESSAGE).await?;
            return Ok(());
        }
    };

    if url_text.len() > config::validation::MAX_URL_LENGTH {
        log::warn!(
            "URL too long: {} characters (max: {})",
            url_text.len(),
            config::validation::MAX_URL_LENGTH
        );
        bot.send_message(msg.chat.id, "Kechirasiz, link juda uzun. Qisqaroq link yuboring.")
            .await?;
        return Ok(());
    }

    let status = bot
        .send_message(msg.chat.id, "🔎 Instagram ma'lumot olinayapti... iltimos kuting")
        .await?;

    match process_link(bot, msg, url_text, deps).await {
        Ok(()) => {
            let _ = bot.delete_message(msg.chat.id, status.id).await;
        }
        Err(e) => {
            if let AppError::Resolve(ref resolve_err) = e {
                log::warn!("Resolution failed ({}) for {}: {}", resolve_err.subcategory(), url_text, e);
            } else {
                log::error!("Failed to process {}: {}", url_text, e);
            }
            let error_text = format!("❌ Xatolik: {}", e);
            if bot.edit_message_text(msg.chat.id, status.id, &error_text).await.is_err() {
                let _ = bot.send_message(msg.chat.id, error_text).await;
            }
        }
    }

    Ok(())
}

/// Resolve one submitted link, append the activity log row, and reply.
///
/// The log row is written only after resolution succeeds; failed
/// resolutions leave no trace in the database.
async fn process_link(bot: &Bot, msg: &Message, url_text: &str, deps: &HandlerDeps) -> AppResult<()> {
    let url = Url::parse(url_text)?;
    let media = deps.instagram.resolve(&url).await?;

    let user_id = msg
        .from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0);
    let username = msg.from.as_ref().and_then(|u| u.username.clone()).unwrap_or_default();
    let first_name = msg.from.as_ref().map(|u| u.first_name.clone()).unwrap_or_default();

    {
        let conn = db::get_connection(&deps.db_pool)?;
        db::add_log(&conn, user_id, &username, &first_name, url_text, &media.media_pk)?;
    }
    log::info!(
        "Resolved {} (media_pk {}) for user {}",
        media.shortcode,
        if media.media_pk.is_empty() { "-" } else { &media.media_pk },
        user_id
    );

    // Media first, caption second
    send_media(bot, msg.chat.id, &media.kind).await?;
    bot.send_message(msg.chat.id, build_caption_text(&media.caption)).await?;

    Ok(())
}

/// Send the resolved media by URL; Telegram fetches the CDN link itself.
async fn send_media(bot: &Bot, chat_id: ChatId, kind: &MediaKind) -> AppResult<()> {
    match kind {
        MediaKind::Video { video_url } => {
            bot.send_video(chat_id, InputFile::url(Url::parse(video_url)?)).await?;
        }
        MediaKind::Photo { display_url } => {
            bot.send_photo(chat_id, InputFile::url(Url::parse(display_url)?)).await?;
        }
        MediaKind::Album { items } if !items.is_empty() => {
            for item in items {
                let file = InputFile::url(Url::parse(&item.url)?);
                if item.is_video {
                    bot.send_video(chat_id, file).await?;
                } else {
                    bot.send_photo(chat_id, file).await?;
                }
            }
        }
        MediaKind::Album { .. } => {
            bot.send_message(chat_id, "❌ Noma'lum media turi. Faqat rasm/video/album qo‘llanadi.")
                .await?;
        }
    }
    Ok(())
}

/// Build the caption reply: caption text plus extracted hashtags and mentions.
fn build_caption_text(caption: &str) -> String {
    let hashtags = extract_hashtags(caption);
    let mentions = extract_mentions(caption);

    format!(
        "📄 Caption:\n{}\n\n🏷 Hashtags: {}\n👤 Mentions: {}",
        if caption.is_empty() { "(yo‘q)" } else { caption },
        if hashtags.is_empty() {
            "Yo‘q".to_string()
        } else {
            hashtags.join(" ")
        },
        if mentions.is_empty() {
            "Yo‘q".to_string()
        } else {
            mentions.join(" ")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_caption_text_with_tags() {
        let text = build_caption_text("ajoyib kun #sunset bilan @dost");
        assert_eq!(
            text,
            "📄 Caption:\najoyib kun #sunset bilan @dost\n\n🏷 Hashtags: #sunset\n👤 Mentions: @dost"
        );
    }

    #[test]
    fn test_build_caption_text_empty() {
        let text = build_caption_text("");
        assert_eq!(text, "📄 Caption:\n(yo‘q)\n\n🏷 Hashtags: Yo‘q\n👤 Mentions: Yo‘q");
    }

    #[test]
    fn test_build_caption_text_multiple_tags() {
        let text = build_caption_text("#a #b @x @y");
        assert!(text.contains("🏷 Hashtags: #a #b"));
        assert!(text.contains("👤 Mentions: @x @y"));
    }
}
