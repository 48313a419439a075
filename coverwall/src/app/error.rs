//! Application error types.

use thiserror::Error;

use crate::cache::ServiceCacheError;
use crate::encode::EncodeError;
use crate::http::HttpError;

/// Errors that can occur during application lifecycle.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to start memory cache service.
    #[error("Failed to start memory cache service: {0}")]
    MemoryCacheStart(#[source] ServiceCacheError),

    /// Failed to start disk cache service.
    #[error("Failed to start disk cache service: {0}")]
    DiskCacheStart(#[source] ServiceCacheError),

    /// Failed to build the shared HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] HttpError),

    /// The encoder rejected its settings.
    #[error("Invalid encoder settings: {0}")]
    Encoder(#[from] EncodeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to create the Tokio runtime.
    #[error("Failed to create Tokio runtime: {0}")]
    RuntimeCreation(String),
}
