//! Error types for the alerts feed.

use thiserror::Error;

/// Feed client errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response
    #[error("Feed returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request did not complete in time
    #[error("Feed request timed out after {0}s")]
    Timeout(u64),

    /// Response body was not a feature collection
    #[error("Failed to decode feed payload: {0}")]
    Decode(String),

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Configured URL is unusable
    #[error("Invalid feed URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl FeedError {
    /// Whether the next polling tick may succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Timeout(_) => true,
            FeedError::Status { status, .. } => matches!(status, 408 | 429 | 500..=599),
            FeedError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FeedError::Decode(_) | FeedError::ClientBuild(_) | FeedError::InvalidUrl { .. } => {
                false
            }
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        // Problem documents can be large; the first line is enough for a log
        let body = body.lines().next().unwrap_or_default();
        FeedError::Status {
            status,
            body: body.chars().take(200).collect(),
        }
    }

    /// Short text for the dashboard header.
    pub fn short_message(&self) -> String {
        match self {
            FeedError::Http(e) if e.is_connect() => "connection failed".to_string(),
            FeedError::Http(e) if e.is_timeout() => "timed out".to_string(),
            FeedError::Http(_) => "network error".to_string(),
            FeedError::Status { status, .. } => format!("HTTP {status}"),
            FeedError::Timeout(_) => "timed out".to_string(),
            FeedError::Decode(_) => "bad payload".to_string(),
            FeedError::ClientBuild(_) => "client error".to_string(),
            FeedError::InvalidUrl { .. } => "invalid URL".to_string(),
        }
    }
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        for status in [500, 502, 503, 504, 429, 408] {
            let err = FeedError::from_http_status(status, "unavailable");
            assert!(err.is_transient(), "{status} should be transient");
        }
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        for status in [400, 403, 404] {
            let err = FeedError::from_http_status(status, "nope");
            assert!(!err.is_transient(), "{status} should not be transient");
        }
        assert!(!FeedError::Decode("missing field".into()).is_transient());
        assert!(FeedError::Timeout(10).is_transient());
    }

    #[test]
    fn test_status_body_is_trimmed_to_first_line() {
        let err = FeedError::from_http_status(503, "  Service Unavailable\n<html>...</html>");
        match err {
            FeedError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_messages() {
        assert_eq!(FeedError::from_http_status(503, "").short_message(), "HTTP 503");
        assert_eq!(FeedError::Decode("x".into()).short_message(), "bad payload");
        assert_eq!(
            FeedError::InvalidUrl {
                url: "ftp://x".into(),
                message: "unsupported scheme".into()
            }
            .to_string(),
            "Invalid feed URL 'ftp://x': unsupported scheme"
        );
    }
}
