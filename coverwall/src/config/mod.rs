//! User configuration stored in `~/.coverwall/config.ini`.
//!
//! ```ini
//! [fetch]
//! timeout = 30
//! workers = 0
//!
//! [mosaic]
//! columns = 10
//! policy = crop
//!
//! [cache]
//! memory_size = 256MB
//! disk_size = 2GB
//! ```
//!
//! Missing files and missing keys fall back to defaults. Command-line flags
//! override whatever is loaded here.

mod file;
mod keys;
mod parser;
mod settings;
mod size;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    default_cache_dir, default_log_file, CacheSettings, ConfigFile, EncodeSettings, FetchSettings,
    LoggingSettings, MosaicSettings,
};
pub use size::{format_size, parse_size, SizeParseError};
