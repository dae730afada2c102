//! Text helpers: link extraction from incoming messages and hashtag/mention
//! parsing of Instagram captions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex for matching URLs
/// Compiled once at startup and reused for all requests
static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("Failed to compile URL regex"));

/// Cached regex for hashtag tokens in captions
static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("Failed to compile hashtag regex"));

/// Cached regex for mention tokens in captions
static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("Failed to compile mention regex"));

/// Returns the first HTTP(S) URL found in the text, if any.
pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_REGEX.find(text).map(|m| m.as_str())
}

/// Extracts `#hashtag` tokens from a caption.
///
/// An empty caption yields an empty list.
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    HASHTAG_REGEX.find_iter(caption).map(|m| m.as_str().to_string()).collect()
}

/// Extracts `@mention` tokens from a caption.
///
/// An empty caption yields an empty list.
pub fn extract_mentions(caption: &str) -> Vec<String> {
    MENTION_REGEX.find_iter(caption).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_first_url() {
        assert_eq!(
            extract_first_url("mana link https://www.instagram.com/p/abc/ qarang"),
            Some("https://www.instagram.com/p/abc/")
        );
        assert_eq!(
            extract_first_url("http://a.example/x https://b.example/y"),
            Some("http://a.example/x")
        );
        assert_eq!(extract_first_url("hech qanday link yo'q"), None);
        assert_eq!(extract_first_url(""), None);
    }

    #[test]
    fn test_extract_first_url_stops_at_whitespace() {
        assert_eq!(
            extract_first_url("https://instagram.com/reel/xyz?igsh=1 trailing"),
            Some("https://instagram.com/reel/xyz?igsh=1")
        );
    }

    #[test]
    fn test_extract_hashtags() {
        assert_eq!(
            extract_hashtags("kun yaxshi #sunset #travel_2024 o'tdi"),
            vec!["#sunset", "#travel_2024"]
        );
        assert_eq!(extract_hashtags(""), Vec::<String>::new());
        assert_eq!(extract_hashtags("no tags here"), Vec::<String>::new());
    }

    #[test]
    fn test_extract_mentions() {
        assert_eq!(extract_mentions("rahmat @ali va @vali_99!"), vec!["@ali", "@vali_99"]);
        assert_eq!(extract_mentions(""), Vec::<String>::new());
    }
}
