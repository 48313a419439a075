//! Common types and utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::ValueEnum;
use coverwall::config::ConfigFile;
use coverwall::encode::FingerprintStrategy;
use coverwall::mosaic::CompositionPolicy;

use crate::error::CliError;

/// Composition policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PolicyArg {
    /// Center-crop tiles in a row to the smallest one
    Crop,
    /// Resize every tile to the configured canonical size first
    Canonical,
}

impl PolicyArg {
    /// Resolve against the config file, which carries the canonical size.
    pub fn to_policy(self, config: &ConfigFile) -> CompositionPolicy {
        match self {
            PolicyArg::Crop => CompositionPolicy::CenterCrop,
            PolicyArg::Canonical => CompositionPolicy::Canonical {
                width: config.mosaic.tile_width,
                height: config.mosaic.tile_height,
            },
        }
    }
}

/// Fingerprint strategy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FingerprintArg {
    /// SHA-256 of the ordered source URLs
    Urls,
    /// SHA-256 of the encoded JPEG bytes
    Bytes,
}

impl From<FingerprintArg> for FingerprintStrategy {
    fn from(arg: FingerprintArg) -> Self {
        match arg {
            FingerprintArg::Urls => FingerprintStrategy::SourceUrls,
            FingerprintArg::Bytes => FingerprintStrategy::EncodedBytes,
        }
    }
}

/// Collect source URLs from positional arguments and an optional list file.
///
/// `-` reads the list from stdin. With no arguments and no `--input`,
/// piped stdin is read as well.
pub fn collect_urls(args: Vec<String>, input: Option<PathBuf>) -> Result<Vec<String>, CliError> {
    let mut urls = args;

    let text = match input {
        Some(path) if path.as_os_str() == "-" => Some(read_stdin()?),
        Some(path) => Some(fs::read_to_string(&path).map_err(|error| CliError::Input {
            path: path.display().to_string(),
            error,
        })?),
        None if urls.is_empty() && !atty::is(atty::Stream::Stdin) => Some(read_stdin()?),
        None => None,
    };

    if let Some(text) = text {
        urls.extend(parse_url_list(&text));
    }

    if urls.is_empty() {
        return Err(CliError::NoUrls);
    }

    Ok(urls)
}

/// One URL per line; blank lines and `#` comments are skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|error| CliError::Input {
            path: "<stdin>".to_string(),
            error,
        })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_url_list_skips_blanks_and_comments() {
        let text = "# featured\nhttps://a/1.jpg\n\n  https://a/2.jpg  \n#https://a/3.jpg\n";
        assert_eq!(
            parse_url_list(text),
            vec!["https://a/1.jpg".to_string(), "https://a/2.jpg".to_string()]
        );
    }

    #[test]
    fn test_collect_urls_appends_file_after_args() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("urls.txt");
        fs::write(&path, "https://a/2.jpg\nhttps://a/3.jpg\n").unwrap();

        let urls = collect_urls(vec!["https://a/1.jpg".to_string()], Some(path)).unwrap();
        assert_eq!(urls, vec!["https://a/1.jpg", "https://a/2.jpg", "https://a/3.jpg"]);
    }

    #[test]
    fn test_collect_urls_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = collect_urls(Vec::new(), Some(temp_dir.path().join("missing.txt")));
        assert!(matches!(result, Err(CliError::Input { .. })));
    }

    #[test]
    fn test_collect_urls_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("urls.txt");
        fs::write(&path, "# nothing here\n").unwrap();

        assert!(matches!(
            collect_urls(Vec::new(), Some(path)),
            Err(CliError::NoUrls)
        ));
    }

    #[test]
    fn test_policy_arg_uses_configured_size() {
        let mut config = ConfigFile::default();
        config.mosaic.tile_width = 300;
        config.mosaic.tile_height = 100;

        assert_eq!(
            PolicyArg::Canonical.to_policy(&config),
            CompositionPolicy::Canonical {
                width: 300,
                height: 100
            }
        );
        assert_eq!(
            PolicyArg::Crop.to_policy(&config),
            CompositionPolicy::CenterCrop
        );
    }
}
