//! Typed contents of `config.ini` and their defaults.

use std::path::PathBuf;

use crate::cache::{DEFAULT_DISK_CACHE_SIZE, DEFAULT_MEMORY_CACHE_SIZE};
use crate::encode::{FingerprintStrategy, DEFAULT_CACHE_LIFETIME, DEFAULT_JPEG_QUALITY};
use crate::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::mosaic::{CompositionPolicy, DEFAULT_CANONICAL_HEIGHT, DEFAULT_CANONICAL_WIDTH};
use crate::pipeline::{DEFAULT_COLUMNS, DEFAULT_DEADLINE};

use super::file::config_directory;

/// All user configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub fetch: FetchSettings,
    pub mosaic: MosaicSettings,
    pub encode: EncodeSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

/// `[fetch]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Per-composition deadline in seconds; 0 disables it.
    pub deadline: u64,
    /// Concurrent fetches per composition; 0 selects `4 × CPUs`.
    pub workers: usize,
    pub user_agent: String,
}

/// `[mosaic]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicSettings {
    pub columns: usize,
    /// Policy kind; a canonical size here is replaced by the tile size.
    pub policy: CompositionPolicy,
    pub tile_width: u32,
    pub tile_height: u32,
}

/// `[encode]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub quality: u8,
    pub fingerprint: FingerprintStrategy,
    pub cache_lifetime_days: u64,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub directory: PathBuf,
    pub memory_size: u64,
    pub disk_size: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            deadline: DEFAULT_DEADLINE.as_secs(),
            workers: 0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.get(),
            policy: CompositionPolicy::CenterCrop,
            tile_width: DEFAULT_CANONICAL_WIDTH,
            tile_height: DEFAULT_CANONICAL_HEIGHT,
        }
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            fingerprint: FingerprintStrategy::default(),
            cache_lifetime_days: DEFAULT_CACHE_LIFETIME.as_secs() / 86_400,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_cache_dir(),
            memory_size: DEFAULT_MEMORY_CACHE_SIZE,
            disk_size: DEFAULT_DISK_CACHE_SIZE,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            mosaic: MosaicSettings::default(),
            encode: EncodeSettings::default(),
            cache: CacheSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl MosaicSettings {
    /// The composition policy these settings describe.
    pub fn composition_policy(&self) -> CompositionPolicy {
        match self.policy {
            CompositionPolicy::CenterCrop => CompositionPolicy::CenterCrop,
            CompositionPolicy::Canonical { .. } => CompositionPolicy::Canonical {
                width: self.tile_width,
                height: self.tile_height,
            },
        }
    }
}

/// Default disk cache directory (`~/.cache/coverwall` on Linux).
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| config_directory().join("cache"))
        .join("coverwall")
}

/// Default log file (`~/.coverwall/logs/coverwall.log`).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join("coverwall.log")
}
