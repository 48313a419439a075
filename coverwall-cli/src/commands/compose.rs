//! The `compose` command: build one mosaic from a list of image URLs.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use coverwall::app::AppConfig;
use coverwall::config::ConfigFile;
use coverwall::pipeline::PipelineOutput;

use super::common::{collect_urls, FingerprintArg, PolicyArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `coverwall compose`.
#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// Image URLs, in grid order
    pub urls: Vec<String>,

    /// Read URLs from a file, one per line (`-` for stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Where to write the JPEG
    #[arg(long, short)]
    pub output: PathBuf,

    /// Images per row
    #[arg(long)]
    pub columns: Option<NonZeroUsize>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Per-request HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Overall fetch deadline in seconds (0 = none)
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Concurrent downloads (0 = 4 per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// How tiles of different sizes are normalized
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// What the ETag is derived from
    #[arg(long, value_enum)]
    pub fingerprint: Option<FingerprintArg>,

    /// Skip the fetch cache
    #[arg(long)]
    pub no_cache: bool,
}

impl ComposeArgs {
    /// File settings with command-line overrides applied.
    fn app_config(&self, file: &ConfigFile) -> Result<AppConfig, CliError> {
        let mut config = AppConfig::from_config_file(file)?;

        if let Some(columns) = self.columns {
            config.pipeline = config.pipeline.with_columns(columns);
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(timeout) = self.timeout {
            config.http = config.http.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(deadline) = self.deadline {
            let deadline = (deadline > 0).then(|| Duration::from_secs(deadline));
            config.pipeline = config.pipeline.with_deadline(deadline);
        }
        if let Some(workers) = self.workers {
            config.pipeline = config.pipeline.with_max_concurrent(workers);
        }
        if let Some(policy) = self.policy {
            config.pipeline = config.pipeline.with_policy(policy.to_policy(file));
        }
        if let Some(fingerprint) = self.fingerprint {
            config.pipeline = config.pipeline.with_fingerprint(fingerprint.into());
        }
        if self.no_cache {
            config = config.without_cache();
        }

        Ok(config)
    }
}

/// Run the compose command.
pub fn run(args: ComposeArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("compose");

    let config = args.app_config(runner.config())?;
    let urls = collect_urls(args.urls, args.input)?;

    println!(
        "Composing {} images into {} columns...",
        urls.len(),
        config.pipeline.columns
    );

    let app = runner.start_app(config)?;

    let cancellation = CancellationToken::new();
    let handler_token = cancellation.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Interrupted, stopping...");
        handler_token.cancel();
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    let result = app.compose_blocking(&urls, &cancellation);
    app.shutdown_sync();
    let PipelineOutput { image, report } = result?;

    runner.save_output(&args.output, image.bytes())?;

    let (width, height) = image.dimensions();
    println!();
    println!(
        "{} {} ({}x{}, {} bytes)",
        style("Wrote").green().bold(),
        args.output.display(),
        width,
        height,
        image.bytes().len()
    );
    println!("  {:<14} {}", style("Images:").cyan(), report);
    println!("  {:<14} {}", style("ETag:").cyan(), image.etag());
    println!("  {:<14} {}", style("Cache-Control:").cyan(), image.cache_control());
    println!("  {:<14} {}", style("Expires:").cyan(), image.expires_header());
    println!("  {:<14} {}", style("Storage key:").cyan(), image.storage_key());

    if !report.is_complete() {
        println!();
        println!(
            "{} {} of {} images were skipped; see the log for details",
            style("Note:").yellow().bold(),
            report.requested - report.tiles(),
            report.requested
        );
    }

    info!(
        output = %args.output.display(),
        etag = %image.etag(),
        "Compose command finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use coverwall::encode::FingerprintStrategy;
    use coverwall::mosaic::CompositionPolicy;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ComposeArgs,
    }

    fn parse(args: &[&str]) -> ComposeArgs {
        let mut argv = vec!["compose"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_defaults_come_from_the_file() {
        let file = ConfigFile::default();
        let config = parse(&["--output", "wall.jpg"]).app_config(&file).unwrap();

        assert_eq!(config.pipeline.columns.get(), file.mosaic.columns);
        assert_eq!(config.quality, file.encode.quality);
        assert!(config.cache_enabled());
    }

    #[test]
    fn test_flags_override_the_file() {
        let file = ConfigFile::default();
        let config = parse(&[
            "--output",
            "wall.jpg",
            "--columns",
            "4",
            "--quality",
            "70",
            "--deadline",
            "0",
            "--workers",
            "3",
            "--policy",
            "canonical",
            "--fingerprint",
            "bytes",
            "--no-cache",
        ])
        .app_config(&file)
        .unwrap();

        assert_eq!(config.pipeline.columns.get(), 4);
        assert_eq!(config.quality, 70);
        assert_eq!(config.pipeline.deadline, None);
        assert_eq!(config.pipeline.max_concurrent, 3);
        assert_eq!(config.pipeline.policy, CompositionPolicy::canonical());
        assert_eq!(config.pipeline.fingerprint, FingerprintStrategy::EncodedBytes);
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        let result = TestCli::try_parse_from(["compose", "-o", "x.jpg", "--quality", "0"]);
        assert!(result.is_err());
    }
}
