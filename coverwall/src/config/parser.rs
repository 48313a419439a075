//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::mosaic::CompositionPolicy;
use super::size::parse_size;

/// Parse an `Ini` into a `ConfigFile`, overlaying values on the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [fetch]
    if let Some(section) = ini.section(Some("fetch")) {
        if let Some(v) = section.get("timeout") {
            config.fetch.timeout = parse_positive("fetch", "timeout", v)?;
        }
        if let Some(v) = section.get("deadline") {
            config.fetch.deadline = parse_number("fetch", "deadline", v, "seconds; 0 disables")?;
        }
        if let Some(v) = section.get("workers") {
            config.fetch.workers = parse_number("fetch", "workers", v, "0 selects 4 × CPUs")?;
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.fetch.user_agent = v.to_string();
            }
        }
    }

    // [mosaic]
    if let Some(section) = ini.section(Some("mosaic")) {
        if let Some(v) = section.get("columns") {
            config.mosaic.columns = parse_positive("mosaic", "columns", v)?;
        }
        if let Some(v) = section.get("policy") {
            config.mosaic.policy = parse_policy(v)?;
        }
        if let Some(v) = section.get("tile_width") {
            config.mosaic.tile_width = parse_positive("mosaic", "tile_width", v)?;
        }
        if let Some(v) = section.get("tile_height") {
            config.mosaic.tile_height = parse_positive("mosaic", "tile_height", v)?;
        }
    }

    // [encode]
    if let Some(section) = ini.section(Some("encode")) {
        if let Some(v) = section.get("quality") {
            config.encode.quality = parse_quality(v)?;
        }
        if let Some(v) = section.get("fingerprint") {
            config.encode.fingerprint =
                v.parse().map_err(|_| invalid("encode", "fingerprint", v, "must be 'urls' or 'bytes'"))?;
        }
        if let Some(v) = section.get("cache_lifetime_days") {
            config.encode.cache_lifetime_days = parse_positive("encode", "cache_lifetime_days", v)?;
        }
    }

    // [cache]
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool("cache", "enabled", v)?;
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("memory_size") {
            config.cache.memory_size = parse_size(v).map_err(|_| {
                invalid("cache", "memory_size", v, "expected format like '256MB' or '1GB'")
            })?;
        }
        if let Some(v) = section.get("disk_size") {
            config.cache.disk_size = parse_size(v).map_err(|_| {
                invalid("cache", "disk_size", v, "expected format like '2GB' or '500MB'")
            })?;
        }
    }

    // [logging]
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

pub(super) fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    hint: &str,
) -> Result<T, ConfigFileError> {
    value.trim().parse().map_err(|_| {
        invalid(
            section,
            key,
            value,
            &format!("must be a non-negative integer ({})", hint),
        )
    })
}

pub(super) fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(invalid(section, key, value, "must be a positive integer")),
    }
}

pub(super) fn parse_quality(value: &str) -> Result<u8, ConfigFileError> {
    match value.trim().parse::<u8>() {
        Ok(q) if (1..=100).contains(&q) => Ok(q),
        _ => Err(invalid("encode", "quality", value, "must be between 1 and 100")),
    }
}

pub(super) fn parse_policy(value: &str) -> Result<CompositionPolicy, ConfigFileError> {
    CompositionPolicy::from_str(value)
        .map_err(|_| invalid("mosaic", "policy", value, "must be 'crop' or 'canonical'"))
}

pub(super) fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}
