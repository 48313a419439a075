//! INI serialization: `ConfigFile` → commented `config.ini` text.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Render `config` as a commented INI document.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[fetch]
; Per-request timeout in seconds
timeout = {timeout}
; Overall deadline per composition in seconds (0 = wait for every fetch)
deadline = {deadline}
; Concurrent fetches per composition (0 = 4 x CPU cores)
workers = {workers}
; User-Agent header sent with every image request
user_agent = {user_agent}

[mosaic]
; Tiles per row
columns = {columns}
; How uneven images are fitted to the grid:
;   crop      - center-crop each row to its smallest image
;   canonical - resize every image to tile_width x tile_height first
policy = {policy}
tile_width = {tile_width}
tile_height = {tile_height}

[encode]
; JPEG quality (1-100)
quality = {quality}
; ETag source: urls (hash of source URLs) or bytes (hash of the JPEG)
fingerprint = {fingerprint}
; Client cache lifetime advertised in Cache-Control and Expires
cache_lifetime_days = {lifetime}

[cache]
; Remember downloaded images between runs
enabled = {enabled}
; Disk cache location
directory = {directory}
; Supports KB, MB, GB suffixes
memory_size = {memory_size}
disk_size = {disk_size}

[logging]
file = {log_file}
"#,
        timeout = config.fetch.timeout,
        deadline = config.fetch.deadline,
        workers = config.fetch.workers,
        user_agent = config.fetch.user_agent,
        columns = config.mosaic.columns,
        policy = config.mosaic.policy.name(),
        tile_width = config.mosaic.tile_width,
        tile_height = config.mosaic.tile_height,
        quality = config.encode.quality,
        fingerprint = config.encode.fingerprint,
        lifetime = config.encode.cache_lifetime_days,
        enabled = config.cache.enabled,
        directory = path_to_string(&config.cache.directory),
        memory_size = format_size(config.cache.memory_size),
        disk_size = format_size(config.cache.disk_size),
        log_file = path_to_string(&config.logging.file),
    )
}

pub(super) fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_every_section() {
        let text = to_config_string(&ConfigFile::default());

        for section in ["[fetch]", "[mosaic]", "[encode]", "[cache]", "[logging]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("memory_size = 256MB"));
        assert!(text.contains("disk_size = 2GB"));
        assert!(text.contains("fingerprint = urls"));
    }
}
