//! Content fingerprints for composed images.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

/// What the fingerprint of an encoded mosaic is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintStrategy {
    /// SHA-256 of the ordered source URLs, concatenated.
    ///
    /// Known before any fetch happens, so callers can answer conditional
    /// requests without composing.
    #[default]
    SourceUrls,

    /// SHA-256 of the encoded output bytes.
    EncodedBytes,
}

impl FingerprintStrategy {
    /// Short name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SourceUrls => "urls",
            Self::EncodedBytes => "bytes",
        }
    }
}

impl fmt::Display for FingerprintStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FingerprintStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urls" | "url" => Ok(Self::SourceUrls),
            "bytes" | "content" => Ok(Self::EncodedBytes),
            other => Err(format!(
                "unknown fingerprint strategy '{}' (expected 'urls' or 'bytes')",
                other
            )),
        }
    }
}

/// Lowercase hex SHA-256 digest identifying a composed image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint of an ordered URL list.
    ///
    /// URLs are concatenated without a separator before hashing.
    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for url in urls {
            hasher.update(url.as_ref().as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Fingerprint of raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strong HTTP validator: the digest in double quotes.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Sharded storage path, e.g. `ab/ab12….jpg`.
    pub fn storage_key(&self, extension: &str) -> String {
        format!("{}/{}.{}", &self.0[..2], self.0, extension)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_digest() {
        let empty: [&str; 0] = [];
        assert_eq!(
            Fingerprint::from_urls(&empty).as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_urls_hash_their_concatenation() {
        let urls = ["http://a/1.jpg", "http://a/2.jpg"];
        assert_eq!(
            Fingerprint::from_urls(&urls),
            Fingerprint::from_bytes(b"http://a/1.jpghttp://a/2.jpg")
        );
    }

    #[test]
    fn test_same_urls_same_fingerprint() {
        let a = Fingerprint::from_urls(&["http://a", "http://b"]);
        let b = Fingerprint::from_urls(&["http://a".to_string(), "http://b".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_changed_url_changes_fingerprint() {
        let a = Fingerprint::from_urls(&["http://a", "http://b"]);
        let b = Fingerprint::from_urls(&["http://a", "http://c"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_changes_fingerprint() {
        let a = Fingerprint::from_urls(&["http://a", "http://b"]);
        let b = Fingerprint::from_urls(&["http://b", "http://a"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_etag_is_quoted() {
        let fp = Fingerprint::from_bytes(b"x");
        assert_eq!(fp.etag(), format!("\"{}\"", fp.as_str()));
    }

    #[test]
    fn test_storage_key_is_sharded() {
        let fp = Fingerprint::from_bytes(b"x");
        let key = fp.storage_key("jpg");
        assert_eq!(key, format!("{}/{}.jpg", &fp.as_str()[..2], fp.as_str()));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "urls".parse::<FingerprintStrategy>(),
            Ok(FingerprintStrategy::SourceUrls)
        );
        assert_eq!(
            "BYTES".parse::<FingerprintStrategy>(),
            Ok(FingerprintStrategy::EncodedBytes)
        );
        assert!("md5".parse::<FingerprintStrategy>().is_err());
        assert_eq!(FingerprintStrategy::default(), FingerprintStrategy::SourceUrls);
    }
}
