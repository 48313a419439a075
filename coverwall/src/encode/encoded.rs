//! Encoded mosaic with HTTP caching metadata.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::mosaic::Mosaic;

use super::encoder::MosaicEncoder;
use super::error::EncodeError;
use super::fingerprint::{Fingerprint, FingerprintStrategy};

/// Default cache lifetime: four weeks.
pub const DEFAULT_CACHE_LIFETIME: Duration = Duration::from_secs(28 * 24 * 60 * 60);

/// IMF-fixdate layout for HTTP date headers.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// An encoded mosaic plus everything a delivery layer needs to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    content_type: &'static str,
    extension: &'static str,
    fingerprint: Fingerprint,
    cache_lifetime: Duration,
    expires_at: DateTime<Utc>,
    width: u32,
    height: u32,
}

impl EncodedImage {
    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the image, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// MIME type, e.g. `image/jpeg`.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Content fingerprint.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// How long clients may cache the image.
    pub fn cache_lifetime(&self) -> Duration {
        self.cache_lifetime
    }

    /// Absolute expiry time.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Pixel dimensions of the encoded image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `ETag` header value (quoted strong validator).
    pub fn etag(&self) -> String {
        self.fingerprint.etag()
    }

    /// `Cache-Control` header value.
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, immutable",
            self.cache_lifetime.as_secs()
        )
    }

    /// `Expires` header value.
    pub fn expires_header(&self) -> String {
        self.expires_at.format(HTTP_DATE_FORMAT).to_string()
    }

    /// Storage path for persistence collaborators, e.g. `ab/ab12….jpg`.
    pub fn storage_key(&self) -> String {
        self.fingerprint.storage_key(self.extension)
    }
}

/// Encode `mosaic` and attach fingerprint and cache metadata.
///
/// `urls` are the source URLs of the request, in input order; they are
/// only used by [`FingerprintStrategy::SourceUrls`].
pub fn encode_mosaic<S: AsRef<str>>(
    mosaic: &Mosaic,
    encoder: &dyn MosaicEncoder,
    urls: &[S],
    strategy: FingerprintStrategy,
    cache_lifetime: Duration,
) -> Result<EncodedImage, EncodeError> {
    encode_mosaic_at(mosaic, encoder, urls, strategy, cache_lifetime, Utc::now())
}

/// [`encode_mosaic`] with an explicit encode time.
pub fn encode_mosaic_at<S: AsRef<str>>(
    mosaic: &Mosaic,
    encoder: &dyn MosaicEncoder,
    urls: &[S],
    strategy: FingerprintStrategy,
    cache_lifetime: Duration,
    now: DateTime<Utc>,
) -> Result<EncodedImage, EncodeError> {
    let expires_at = chrono::Duration::from_std(cache_lifetime)
        .ok()
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or(EncodeError::InvalidCacheLifetime(cache_lifetime.as_secs()))?;

    let bytes = encoder.encode(mosaic)?;

    let fingerprint = match strategy {
        FingerprintStrategy::SourceUrls => Fingerprint::from_urls(urls),
        FingerprintStrategy::EncodedBytes => Fingerprint::from_bytes(&bytes),
    };

    debug!(
        encoder = %encoder.name(),
        bytes = bytes.len(),
        fingerprint = %fingerprint,
        "Mosaic encoded"
    );

    Ok(EncodedImage {
        bytes,
        content_type: encoder.content_type(),
        extension: encoder.extension(),
        fingerprint,
        cache_lifetime,
        expires_at,
        width: mosaic.width(),
        height: mosaic.height(),
    })
}
