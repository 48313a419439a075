//! HTTP client abstraction for fetching tile images.
//!
//! The fetcher never talks to `reqwest` directly. It is generic over
//! [`AsyncHttpClient`], which keeps the network edge swappable and lets tests
//! drive the whole pipeline with canned responses.
//!
//! ```ignore
//! use coverwall::http::{AsyncReqwestClient, HttpClientConfig};
//!
//! let client = AsyncReqwestClient::with_config(&HttpClientConfig::default())?;
//! let bytes = client.get("https://example.com/header.jpg").await?;
//! ```

mod client;
mod error;

pub use client::{
    AsyncHttpClient, AsyncReqwestClient, HttpClientConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use error::HttpError;

#[cfg(test)]
pub use client::tests::MockAsyncHttpClient;
