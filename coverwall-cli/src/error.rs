//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and exit codes for every command.

use std::fmt;
use std::process;

use coverwall::app::AppError;
use coverwall::config::ConfigFileError;
use coverwall::pipeline::MosaicError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// No source URLs were given
    NoUrls,
    /// Failed to read the URL list
    Input { path: String, error: std::io::Error },
    /// Failed to start the application
    Startup(AppError),
    /// The composition request failed
    Compose(MosaicError),
    /// Failed to write the output file
    FileWrite { path: String, error: std::io::Error },
    /// Failed to read cache statistics
    CacheStats(String),
    /// Failed to clear the cache
    CacheClear(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::NoUrls => {
                eprintln!();
                eprintln!("Pass URLs as arguments, with --input FILE, or pipe them on stdin:");
                eprintln!("  coverwall compose --output wall.jpg < urls.txt");
            }
            CliError::Compose(MosaicError::NoTilesAvailable { .. }) => {
                eprintln!();
                eprintln!("Every source URL failed. Check that the URLs point at images");
                eprintln!("and see the log file for per-URL errors.");
            }
            CliError::Compose(MosaicError::InsufficientForMosaic { .. }) => {
                eprintln!();
                eprintln!("Images were downloaded but could not be arranged into a grid.");
                eprintln!("Try --policy canonical to resize every image to the same size.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::NoUrls => write!(f, "No source URLs given"),
            CliError::Input { path, error } => {
                write!(f, "Failed to read URL list '{}': {}", path, error)
            }
            CliError::Startup(e) => write!(f, "Failed to start: {}", e),
            CliError::Compose(MosaicError::NoTilesAvailable { requested }) => {
                write!(f, "Not found: none of the {} images could be fetched", requested)
            }
            CliError::Compose(MosaicError::InsufficientForMosaic { tiles, columns }) => write!(
                f,
                "Composition failed: {} images could not fill a {}-column grid",
                tiles, columns
            ),
            CliError::Compose(MosaicError::Cancelled) => write!(f, "Interrupted"),
            CliError::Compose(e) => write!(f, "Internal error: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::CacheStats(msg) => write!(f, "Failed to read cache statistics: {}", msg),
            CliError::CacheClear(msg) => write!(f, "Failed to clear cache: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Input { error, .. } => Some(error),
            CliError::Startup(e) => Some(e),
            CliError::Compose(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Compose(e)
    }
}
