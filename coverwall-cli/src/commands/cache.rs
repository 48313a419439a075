//! Cache management CLI commands.

use clap::Subcommand;
use coverwall::cache::{DiskCacheProvider, DiskProviderConfig, DEFAULT_GC_INTERVAL};
use coverwall::config::{format_size, ConfigFile};
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Clear the disk cache, removing all cached images
    Clear,
    /// Show disk cache statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    let provider_config = DiskProviderConfig {
        directory: config.cache.directory.clone(),
        max_size_bytes: config.cache.disk_size,
        gc_interval: DEFAULT_GC_INTERVAL,
    };

    let runtime = Runtime::new().map_err(|e| CliError::Config(e.to_string()))?;

    runtime.block_on(async {
        let provider = match action {
            CacheAction::Clear => DiskCacheProvider::start(provider_config)
                .await
                .map_err(|e| CliError::CacheClear(e.to_string()))?,
            CacheAction::Stats => DiskCacheProvider::start(provider_config)
                .await
                .map_err(|e| CliError::CacheStats(e.to_string()))?,
        };

        let result = match action {
            CacheAction::Clear => {
                println!("Clearing disk cache at: {}", provider.directory().display());
                provider
                    .clear()
                    .await
                    .map(|freed| {
                        println!(
                            "Deleted {} files, freed {}",
                            freed.entries,
                            format_size(freed.bytes)
                        );
                    })
                    .map_err(|e| CliError::CacheClear(e.to_string()))
            }
            CacheAction::Stats => {
                println!("Disk cache: {}", provider.directory().display());
                provider
                    .scan()
                    .await
                    .map(|usage| {
                        println!("  Files: {}", usage.entries);
                        println!(
                            "  Size:  {} of {}",
                            format_size(usage.bytes),
                            format_size(config.cache.disk_size)
                        );
                    })
                    .map_err(|e| CliError::CacheStats(e.to_string()))
            }
        };

        provider.shutdown().await;
        result
    })
}
