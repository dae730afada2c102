use thiserror::Error;

/// Structured error type for Instagram media resolution.
///
/// Categorized variants so the handler and logs can tell an upstream API
/// failure from a bad response shape or an unavailable post.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// GraphQL endpoint errors (bad status, doc_id expiry, error payloads)
    #[error("Instagram API error: {0}")]
    Api(String),

    /// Response arrived but could not be interpreted
    #[error("Failed to parse Instagram response: {0}")]
    Parse(String),

    /// Post is private, deleted, or has no usable media
    #[error("{0}")]
    Unavailable(String),

    /// Internal sliding-window limit was hit
    #[error("Rate limited, try again later")]
    RateLimited,

    /// Transport-level failures
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ResolveError {
    /// Returns subcategory for logging
    pub fn subcategory(&self) -> &'static str {
        match self {
            ResolveError::Api(_) => "api",
            ResolveError::Parse(_) => "parse",
            ResolveError::Unavailable(_) => "unavailable",
            ResolveError::RateLimited => "rate_limited",
            ResolveError::Http(_) => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::Api("doc_id may be expired".into());
        assert_eq!(err.to_string(), "Instagram API error: doc_id may be expired");

        let err = ResolveError::Unavailable("Post not found".into());
        assert_eq!(err.to_string(), "Post not found");
    }

    #[test]
    fn test_resolve_error_subcategory() {
        assert_eq!(ResolveError::Api("".into()).subcategory(), "api");
        assert_eq!(ResolveError::Parse("".into()).subcategory(), "parse");
        assert_eq!(ResolveError::Unavailable("".into()).subcategory(), "unavailable");
        assert_eq!(ResolveError::RateLimited.subcategory(), "rate_limited");
    }
}
