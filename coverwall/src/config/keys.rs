//! Key-based access for `coverwall config get|set|list`.

use std::str::FromStr;

use thiserror::Error;

use super::file::ConfigFileError;
use super::parser::{expand_tilde, parse_bool, parse_policy, parse_positive, parse_quality};
use super::settings::ConfigFile;
use super::size::{format_size, parse_size};
use super::writer::path_to_string;

/// Errors from getting or setting a value by key.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value failed validation.
    #[error(transparent)]
    Invalid(#[from] ConfigFileError),
}

/// Every settable configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    FetchTimeout,
    FetchDeadline,
    FetchWorkers,
    FetchUserAgent,

    MosaicColumns,
    MosaicPolicy,
    MosaicTileWidth,
    MosaicTileHeight,

    EncodeQuality,
    EncodeFingerprint,
    EncodeCacheLifetimeDays,

    CacheEnabled,
    CacheDirectory,
    CacheMemorySize,
    CacheDiskSize,

    LoggingFile,
}

impl ConfigKey {
    /// All keys, in file order.
    pub const ALL: [ConfigKey; 16] = [
        ConfigKey::FetchTimeout,
        ConfigKey::FetchDeadline,
        ConfigKey::FetchWorkers,
        ConfigKey::FetchUserAgent,
        ConfigKey::MosaicColumns,
        ConfigKey::MosaicPolicy,
        ConfigKey::MosaicTileWidth,
        ConfigKey::MosaicTileHeight,
        ConfigKey::EncodeQuality,
        ConfigKey::EncodeFingerprint,
        ConfigKey::EncodeCacheLifetimeDays,
        ConfigKey::CacheEnabled,
        ConfigKey::CacheDirectory,
        ConfigKey::CacheMemorySize,
        ConfigKey::CacheDiskSize,
        ConfigKey::LoggingFile,
    ];

    /// Canonical `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::FetchTimeout => "fetch.timeout",
            ConfigKey::FetchDeadline => "fetch.deadline",
            ConfigKey::FetchWorkers => "fetch.workers",
            ConfigKey::FetchUserAgent => "fetch.user_agent",
            ConfigKey::MosaicColumns => "mosaic.columns",
            ConfigKey::MosaicPolicy => "mosaic.policy",
            ConfigKey::MosaicTileWidth => "mosaic.tile_width",
            ConfigKey::MosaicTileHeight => "mosaic.tile_height",
            ConfigKey::EncodeQuality => "encode.quality",
            ConfigKey::EncodeFingerprint => "encode.fingerprint",
            ConfigKey::EncodeCacheLifetimeDays => "encode.cache_lifetime_days",
            ConfigKey::CacheEnabled => "cache.enabled",
            ConfigKey::CacheDirectory => "cache.directory",
            ConfigKey::CacheMemorySize => "cache.memory_size",
            ConfigKey::CacheDiskSize => "cache.disk_size",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Key part of the name.
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Current value rendered as it would appear in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::FetchTimeout => config.fetch.timeout.to_string(),
            ConfigKey::FetchDeadline => config.fetch.deadline.to_string(),
            ConfigKey::FetchWorkers => config.fetch.workers.to_string(),
            ConfigKey::FetchUserAgent => config.fetch.user_agent.clone(),
            ConfigKey::MosaicColumns => config.mosaic.columns.to_string(),
            ConfigKey::MosaicPolicy => config.mosaic.policy.name().to_string(),
            ConfigKey::MosaicTileWidth => config.mosaic.tile_width.to_string(),
            ConfigKey::MosaicTileHeight => config.mosaic.tile_height.to_string(),
            ConfigKey::EncodeQuality => config.encode.quality.to_string(),
            ConfigKey::EncodeFingerprint => config.encode.fingerprint.to_string(),
            ConfigKey::EncodeCacheLifetimeDays => config.encode.cache_lifetime_days.to_string(),
            ConfigKey::CacheEnabled => config.cache.enabled.to_string(),
            ConfigKey::CacheDirectory => path_to_string(&config.cache.directory),
            ConfigKey::CacheMemorySize => format_size(config.cache.memory_size),
            ConfigKey::CacheDiskSize => format_size(config.cache.disk_size),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Validate `value` and store it.
    ///
    /// The config is left untouched when validation fails.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let (section, key) = (self.section(), self.key_name());
        match self {
            ConfigKey::FetchTimeout => {
                config.fetch.timeout = parse_positive(section, key, value)?;
            }
            ConfigKey::FetchDeadline => {
                config.fetch.deadline = parse_count(section, key, value)?;
            }
            ConfigKey::FetchWorkers => {
                config.fetch.workers = parse_count(section, key, value)?;
            }
            ConfigKey::FetchUserAgent => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(invalid(section, key, value, "must not be empty").into());
                }
                config.fetch.user_agent = value.to_string();
            }
            ConfigKey::MosaicColumns => {
                config.mosaic.columns = parse_positive(section, key, value)?;
            }
            ConfigKey::MosaicPolicy => {
                config.mosaic.policy = parse_policy(value)?;
            }
            ConfigKey::MosaicTileWidth => {
                config.mosaic.tile_width = parse_positive(section, key, value)?;
            }
            ConfigKey::MosaicTileHeight => {
                config.mosaic.tile_height = parse_positive(section, key, value)?;
            }
            ConfigKey::EncodeQuality => {
                config.encode.quality = parse_quality(value)?;
            }
            ConfigKey::EncodeFingerprint => {
                config.encode.fingerprint = value
                    .parse()
                    .map_err(|reason: String| invalid(section, key, value, &reason))?;
            }
            ConfigKey::EncodeCacheLifetimeDays => {
                config.encode.cache_lifetime_days = parse_positive(section, key, value)?;
            }
            ConfigKey::CacheEnabled => {
                config.cache.enabled = parse_bool(section, key, value)?;
            }
            ConfigKey::CacheDirectory => {
                config.cache.directory = parse_path(section, key, value)?;
            }
            ConfigKey::CacheMemorySize => {
                config.cache.memory_size =
                    parse_size(value).map_err(|e| invalid(section, key, value, &e.to_string()))?;
            }
            ConfigKey::CacheDiskSize => {
                config.cache.disk_size =
                    parse_size(value).map_err(|e| invalid(section, key, value, &e.to_string()))?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = parse_path(section, key, value)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    super::parser::invalid(section, key, value, reason)
}

fn parse_count<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn parse_path(
    section: &str,
    key: &str,
    value: &str,
) -> Result<std::path::PathBuf, ConfigFileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(section, key, value, "must not be empty"));
    }
    Ok(expand_tilde(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::FingerprintStrategy;
    use std::path::PathBuf;

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::ALL {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), key);
            assert_eq!(format!("{}.{}", key.section(), key.key_name()), key.name());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Mosaic.Columns".parse::<ConfigKey>().unwrap(),
            ConfigKey::MosaicColumns
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "mosaic.rows".parse::<ConfigKey>(),
            Err(ConfigKeyError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_get_defaults() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::MosaicColumns.get(&config), "10");
        assert_eq!(ConfigKey::CacheMemorySize.get(&config), "256MB");
        assert_eq!(ConfigKey::EncodeFingerprint.get(&config), "urls");
        assert_eq!(ConfigKey::CacheEnabled.get(&config), "true");
    }

    #[test]
    fn test_set_values() {
        let mut config = ConfigFile::default();

        ConfigKey::MosaicColumns.set(&mut config, "5").unwrap();
        ConfigKey::EncodeFingerprint.set(&mut config, "bytes").unwrap();
        ConfigKey::CacheDiskSize.set(&mut config, "500MB").unwrap();
        ConfigKey::CacheDirectory.set(&mut config, "/srv/cache").unwrap();
        ConfigKey::FetchDeadline.set(&mut config, "0").unwrap();
        ConfigKey::MosaicPolicy.set(&mut config, "Canonical").unwrap();

        assert_eq!(config.mosaic.columns, 5);
        assert_eq!(config.encode.fingerprint, FingerprintStrategy::EncodedBytes);
        assert_eq!(config.cache.disk_size, 500 * 1024 * 1024);
        assert_eq!(config.cache.directory, PathBuf::from("/srv/cache"));
        assert_eq!(config.fetch.deadline, 0);
        assert_eq!(ConfigKey::MosaicPolicy.get(&config), "canonical");
    }

    #[test]
    fn test_set_invalid_leaves_config_untouched() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::MosaicColumns.set(&mut config, "0").is_err());
        assert!(ConfigKey::EncodeQuality.set(&mut config, "150").is_err());
        assert!(ConfigKey::MosaicPolicy.set(&mut config, "stretch").is_err());
        assert!(ConfigKey::CacheEnabled.set(&mut config, "maybe").is_err());
        assert!(ConfigKey::FetchUserAgent.set(&mut config, "  ").is_err());

        assert_eq!(config, ConfigFile::default());
    }
}
