//! Error types for HTTP operations.

use thiserror::Error;

/// Errors returned by an [`AsyncHttpClient`](super::AsyncHttpClient).
///
/// "Not found" is kept apart from other status failures because the fetcher
/// treats it as an expected, silent skip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// The origin answered 404 Not Found.
    #[error("HTTP 404 Not Found from {url}")]
    NotFound { url: String },

    /// The origin answered with any other non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request exceeded the client timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read completely.
    #[error("failed to read response: {0}")]
    Body(String),

    /// The client itself could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl HttpError {
    /// Returns true if the origin reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = HttpError::NotFound {
            url: "http://example.com/a.jpg".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 Not Found from http://example.com/a.jpg"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_display() {
        let err = HttpError::Status {
            url: "http://example.com/a.jpg".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://example.com/a.jpg");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_timeout_is_not_not_found() {
        let err = HttpError::Timeout("30s elapsed".to_string());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("timed out"));
    }
}
