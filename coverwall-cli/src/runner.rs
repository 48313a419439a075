//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, app startup and
//! output writing so command handlers stay short.

use std::path::Path;

use tracing::info;

use coverwall::app::{AppConfig, CoverwallApp};
use coverwall::config::ConfigFile;
use coverwall::logging::{default_log_file_name, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config file and initialize logging.
    ///
    /// Log output goes to the configured file; `debug` also mirrors it to
    /// stdout at debug level.
    pub fn with_debug(debug: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| default_log_file_name().to_string());

        let logging_guard = init_logging(log_dir, &log_file, debug, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Coverwall v{}", coverwall::VERSION);
        info!("Coverwall CLI: {} command", command);
    }

    /// Start the application on its own runtime.
    pub fn start_app(&self, config: AppConfig) -> Result<CoverwallApp, CliError> {
        CoverwallApp::start_sync(config)
            .map_err(CliError::Startup)
            .inspect(|_| info!("Application started"))
    }

    /// Write the encoded mosaic to `path`.
    pub fn save_output(&self, path: &Path, data: &[u8]) -> Result<(), CliError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|error| CliError::FileWrite {
                path: parent.display().to_string(),
                error,
            })?;
        }

        std::fs::write(path, data).map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        })?;

        info!(path = %path.display(), bytes = data.len(), "Mosaic saved");
        Ok(())
    }
}
