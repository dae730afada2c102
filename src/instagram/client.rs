//! InstagramClient resolves post/reel URLs via the internal GraphQL API.
//!
//! Calls Instagram's GraphQL endpoint directly with the public web-app
//! headers. Public posts and reels resolve anonymously; an optional
//! `IG_SESSION_ID` cookie unlocks posts that require a session.
//!
//! Features:
//! - Shortcode extraction from `/p/`, `/reel/`, `/reels/`, `/tv/` URLs
//! - `doc_id` is configurable via `INSTAGRAM_DOC_ID` env var (rotates every 2-4 weeks)
//! - Internal sliding-window rate limiter (180 req/hr, conservative under 200 limit)
//! - Photo, video and album (sidecar) posts

use std::sync::Mutex;
use std::time::Instant;

use url::Url;

use crate::core::config;

use super::error::ResolveError;

/// Sliding-window rate limiter for Instagram GraphQL API calls.
/// Tracks timestamps of recent requests, global per-IP.
struct RateLimiter {
    timestamps: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            timestamps: Mutex::new(Vec::new()),
        }
    }

    /// Try to acquire a slot. Returns true if under limit, false if rate-limited.
    fn acquire(&self) -> bool {
        let mut ts = self.timestamps.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = Instant::now() - std::time::Duration::from_secs(3600);
        ts.retain(|t| *t > cutoff);
        if ts.len() >= config::instagram::RATE_LIMIT_PER_HOUR {
            return false;
        }
        ts.push(Instant::now());
        true
    }
}

/// A single item inside an album (sidecar) post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumItem {
    pub is_video: bool,
    /// Video URL for videos, display URL for photos.
    pub url: String,
}

/// The media payload of a resolved post, tagged by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Photo { display_url: String },
    Video { video_url: String },
    Album { items: Vec<AlbumItem> },
}

/// A resolved Instagram post: identifier, owner, caption, and media.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    /// Resolver-assigned media identifier (GraphQL `id`), empty if absent.
    pub media_pk: String,
    pub shortcode: String,
    pub username: String,
    /// Caption text, empty when the post has none.
    pub caption: String,
    pub kind: MediaKind,
}

/// Instagram media resolver using the internal GraphQL API.
pub struct InstagramClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl Default for InstagramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InstagramClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36")
            .timeout(config::network::timeout())
            .connect_timeout(config::network::connect_timeout())
            .build()
            .expect("InstagramClient HTTP client build should succeed");

        if config::instagram::SESSION_ID.is_some() {
            log::info!("InstagramClient: session cookie configured, requests will be authenticated");
        }

        Self {
            client,
            rate_limiter: RateLimiter::new(),
        }
    }

    /// Extract the shortcode from an Instagram URL.
    ///
    /// Supports:
    /// - `/p/<code>/`, `/reel/<code>/`, `/reels/<code>/`, `/tv/<code>/`
    /// - `/<username>/p/<code>/`, `/<username>/reel/<code>/` (with username prefix)
    pub fn extract_shortcode(url: &Url) -> Option<String> {
        let host = url.host_str()?.to_lowercase();
        if host != "instagram.com" && host != "www.instagram.com" {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        const CONTENT_TYPES: &[&str] = &["p", "reel", "reels", "tv"];
        // Format: /reel/<code>/ (2 segments)
        if segments.len() >= 2 && CONTENT_TYPES.contains(&segments[0]) {
            return Some(segments[1].to_string());
        }
        // Format: /<username>/reel/<code>/ (3 segments)
        if segments.len() >= 3 && CONTENT_TYPES.contains(&segments[1]) {
            return Some(segments[2].to_string());
        }
        None
    }

    /// Resolve an Instagram post/reel URL into its media and caption.
    pub async fn resolve(&self, url: &Url) -> Result<ResolvedMedia, ResolveError> {
        let shortcode = Self::extract_shortcode(url)
            .ok_or_else(|| ResolveError::Unavailable("Not an Instagram post or reel URL".to_string()))?;

        if !self.rate_limiter.acquire() {
            log::warn!("InstagramClient: internal rate limit hit for {}", shortcode);
            return Err(ResolveError::RateLimited);
        }

        let body = self.fetch_graphql_media(&shortcode).await?;
        parse_media_response(&shortcode, &body)
    }

    /// Fetch the raw GraphQL document for a shortcode.
    async fn fetch_graphql_media(&self, shortcode: &str) -> Result<serde_json::Value, ResolveError> {
        let doc_id = config::instagram::DOC_ID.as_str();
        let variables = format!(r#"{{"shortcode":"{}"}}"#, shortcode);
        let body = format!(
            "doc_id={}&variables={}&lsd={}",
            doc_id,
            urlencoding::encode(&variables),
            config::instagram::FB_LSD_TOKEN
        );

        let mut request = self
            .client
            .post(config::instagram::GRAPHQL_ENDPOINT)
            .header("X-IG-App-ID", config::instagram::IG_APP_ID)
            .header("X-FB-LSD", config::instagram::FB_LSD_TOKEN)
            .header("X-ASBD-ID", config::instagram::FB_ASBD_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Referer", "https://www.instagram.com/")
            .header("Origin", "https://www.instagram.com");

        if let Some(ref session_id) = *config::instagram::SESSION_ID {
            request = request.header("Cookie", format!("sessionid={}", session_id));
        }

        log::info!("InstagramClient: GraphQL POST for shortcode {}", shortcode);

        let response = request.body(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Api(format!("GraphQL endpoint returned HTTP {}", status)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "InstagramClient: GraphQL returned non-JSON ({}): {}",
                e,
                text.chars().take(500).collect::<String>()
            );
            ResolveError::Parse(format!("GraphQL response is not JSON: {}", e))
        })
    }
}

/// Interpret a GraphQL shortcode-media document into [`ResolvedMedia`].
///
/// Navigates the response with `serde_json` pointers. Split out of the
/// client so canned responses can be parsed in tests.
pub fn parse_media_response(shortcode: &str, body: &serde_json::Value) -> Result<ResolvedMedia, ResolveError> {
    // Detect doc_id expiry or error responses
    if let Some(message) = body.get("message").and_then(|v| v.as_str()) {
        if message.contains("useragent mismatch") || message.contains("doc_id") {
            log::error!("InstagramClient: possible doc_id expiry: {}", message);
            return Err(ResolveError::Api(format!("doc_id may be expired: {}", message)));
        }
    }

    let media = body
        .pointer("/data/xdt_shortcode_media")
        .or_else(|| body.pointer("/data/shortcode_media"))
        .ok_or_else(|| {
            if let Some(message) = body.get("message").and_then(|v| v.as_str()) {
                if message.contains("checkpoint_required") || message.contains("login_required") {
                    return ResolveError::Unavailable("Private account or login required".to_string());
                }
            }
            ResolveError::Unavailable("Post not found or media unavailable".to_string())
        })?;

    let media_pk = media.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string();

    let caption = media
        .pointer("/edge_media_to_caption/edges/0/node/text")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let username = media
        .pointer("/owner/username")
        .and_then(|v| v.as_str())
        .unwrap_or("instagram")
        .to_string();

    let is_video = media.get("is_video").and_then(|v| v.as_bool()).unwrap_or(false);

    // Check for carousel (sidecar)
    let sidecar_edges = media
        .pointer("/edge_sidecar_to_children/edges")
        .and_then(|v| v.as_array());

    let kind = if let Some(edges) = sidecar_edges {
        let items = edges
            .iter()
            .filter_map(|edge| {
                let node = edge.get("node")?;
                let item_is_video = node.get("is_video").and_then(|v| v.as_bool()).unwrap_or(false);
                let url = if item_is_video {
                    node.get("video_url").and_then(|v| v.as_str())
                } else {
                    node.get("display_url").and_then(|v| v.as_str())
                };
                url.map(|u| AlbumItem {
                    is_video: item_is_video,
                    url: u.to_string(),
                })
            })
            .collect();
        MediaKind::Album { items }
    } else if is_video {
        let video_url = media
            .get("video_url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResolveError::Unavailable("Video URL missing in response".to_string()))?;
        MediaKind::Video {
            video_url: video_url.to_string(),
        }
    } else {
        let display_url = media
            .get("display_url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResolveError::Unavailable("No media found in post".to_string()))?;
        MediaKind::Photo {
            display_url: display_url.to_string(),
        }
    };

    Ok(ResolvedMedia {
        media_pk,
        shortcode: shortcode.to_string(),
        username,
        caption,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse_url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_shortcode_post_and_reel() {
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.instagram.com/p/Cxyz123/")),
            Some("Cxyz123".to_string())
        );
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://instagram.com/reel/DAbc_45-/?igsh=x")),
            Some("DAbc_45-".to_string())
        );
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.instagram.com/tv/Code99/")),
            Some("Code99".to_string())
        );
    }

    #[test]
    fn test_extract_shortcode_with_username_prefix() {
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.instagram.com/someuser/reel/Cshort/")),
            Some("Cshort".to_string())
        );
    }

    #[test]
    fn test_extract_shortcode_rejects_other_urls() {
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.instagram.com/someuser/")),
            None
        );
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.youtube.com/p/abc/")),
            None
        );
        assert_eq!(
            InstagramClient::extract_shortcode(&parse_url("https://www.instagram.com/")),
            None
        );
    }

    #[test]
    fn test_parse_photo_post() {
        let body = json!({
            "data": {
                "xdt_shortcode_media": {
                    "id": "3123456789",
                    "is_video": false,
                    "display_url": "https://cdn.example/photo.jpg",
                    "owner": {"username": "someuser"},
                    "edge_media_to_caption": {
                        "edges": [{"node": {"text": "salom #tag @friend"}}]
                    }
                }
            }
        });

        let media = parse_media_response("Cxyz", &body).unwrap();
        assert_eq!(media.media_pk, "3123456789");
        assert_eq!(media.username, "someuser");
        assert_eq!(media.caption, "salom #tag @friend");
        assert_eq!(
            media.kind,
            MediaKind::Photo {
                display_url: "https://cdn.example/photo.jpg".to_string()
            }
        );
    }

    #[test]
    fn test_parse_video_post_without_caption() {
        let body = json!({
            "data": {
                "xdt_shortcode_media": {
                    "id": "42",
                    "is_video": true,
                    "video_url": "https://cdn.example/clip.mp4",
                    "display_url": "https://cdn.example/thumb.jpg",
                    "owner": {"username": "reeluser"},
                    "edge_media_to_caption": {"edges": []}
                }
            }
        });

        let media = parse_media_response("Cvid", &body).unwrap();
        assert_eq!(media.caption, "");
        assert_eq!(
            media.kind,
            MediaKind::Video {
                video_url: "https://cdn.example/clip.mp4".to_string()
            }
        );
    }

    #[test]
    fn test_parse_album_post() {
        let body = json!({
            "data": {
                "xdt_shortcode_media": {
                    "id": "77",
                    "is_video": false,
                    "display_url": "https://cdn.example/cover.jpg",
                    "owner": {"username": "albumuser"},
                    "edge_sidecar_to_children": {
                        "edges": [
                            {"node": {"is_video": false, "display_url": "https://cdn.example/1.jpg"}},
                            {"node": {"is_video": true, "video_url": "https://cdn.example/2.mp4"}}
                        ]
                    }
                }
            }
        });

        let media = parse_media_response("Calb", &body).unwrap();
        match media.kind {
            MediaKind::Album { items } => {
                assert_eq!(items.len(), 2);
                assert!(!items[0].is_video);
                assert_eq!(items[0].url, "https://cdn.example/1.jpg");
                assert!(items[1].is_video);
                assert_eq!(items[1].url, "https://cdn.example/2.mp4");
            }
            other => panic!("expected album, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_login_required() {
        let body = json!({"message": "login_required", "status": "fail"});
        let err = parse_media_response("Cpriv", &body).unwrap_err();
        assert!(matches!(err, ResolveError::Unavailable(_)));
        assert!(err.to_string().contains("login required"));
    }

    #[test]
    fn test_parse_doc_id_expiry() {
        let body = json!({"message": "unknown doc_id", "status": "fail"});
        let err = parse_media_response("Cexp", &body).unwrap_err();
        assert!(matches!(err, ResolveError::Api(_)));
    }

    #[test]
    fn test_parse_missing_media() {
        let body = json!({"data": {}});
        let err = parse_media_response("Cmiss", &body).unwrap_err();
        assert!(matches!(err, ResolveError::Unavailable(_)));
    }
}
