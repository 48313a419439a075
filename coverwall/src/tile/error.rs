//! Per-URL fetch failure reasons.

use thiserror::Error;

use crate::http::HttpError;

/// Why a single source URL produced no tile.
///
/// These are recovered locally by the fetcher: the URL is skipped and the
/// rest of the request continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TileUnavailable {
    /// The origin has no image at this URL.
    #[error("not found")]
    NotFound,

    /// The origin answered with a non-success status other than 404.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The request did not complete within the per-request timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("body read failed: {0}")]
    Body(String),

    /// The bytes are not a decodable image.
    #[error("undecodable image: {0}")]
    Decode(String),
}

impl TileUnavailable {
    /// Returns true for the expected "not found" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TileUnavailable::NotFound)
    }
}

impl From<HttpError> for TileUnavailable {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::NotFound { .. } => TileUnavailable::NotFound,
            HttpError::Status { status, .. } => TileUnavailable::HttpStatus(status),
            HttpError::Timeout(msg) => TileUnavailable::Timeout(msg),
            HttpError::Request(msg) | HttpError::ClientBuild(msg) => TileUnavailable::Request(msg),
            HttpError::Body(msg) => TileUnavailable::Body(msg),
        }
    }
}
