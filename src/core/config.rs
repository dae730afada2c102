use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: database.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "database.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(crate) fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMIN_IDS environment variable
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default()
    });
}

/// Instagram API configuration
pub mod instagram {
    use once_cell::sync::Lazy;
    use std::env;

    /// Instagram GraphQL API endpoint.
    pub const GRAPHQL_ENDPOINT: &str = "https://www.instagram.com/api/graphql";

    /// Instagram internal app ID (public, embedded in the web app).
    pub const IG_APP_ID: &str = "936619743392459";

    /// Facebook LSD token (anti-CSRF, public static value used by web scrapers).
    pub const FB_LSD_TOKEN: &str = "AVqbxe3J_YA";

    /// Facebook ASBD ID (public, embedded in the web app).
    pub const FB_ASBD_ID: &str = "129477";

    /// Maximum requests per hour (conservative, under Instagram's ~200 limit).
    pub const RATE_LIMIT_PER_HOUR: usize = 180;

    /// GraphQL doc_id for the shortcode media query
    /// Read from INSTAGRAM_DOC_ID environment variable (rotates every 2-4 weeks)
    pub static DOC_ID: Lazy<String> =
        Lazy::new(|| env::var("INSTAGRAM_DOC_ID").unwrap_or_else(|_| "8845758582119845".to_string()));

    /// Optional Instagram session cookie for authenticated requests
    /// Read from IG_SESSION_ID environment variable
    /// Anonymous access works for public posts; some posts require a session
    pub static SESSION_ID: Lazy<Option<String>> =
        Lazy::new(|| env::var("IG_SESSION_ID").ok().filter(|s| !s.is_empty()));
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for HTTP requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Connect timeout for HTTP requests (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Validation configuration
pub mod validation {
    /// Maximum URL length (RFC 7230 recommends 8000, but we use 2048 for safety)
    pub const MAX_URL_LENGTH: usize = 2048;
}

/// Activity log query configuration
pub mod logs {
    /// Default number of rows for /logs
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Maximum number of rows a /logs argument can request
    pub const MAX_LIMIT: i64 = 500;

    /// Fixed number of links returned by /links
    pub const LINKS_LIMIT: i64 = 200;
}
