//! Coverwall CLI - compose cover images into one mosaic.
//!
//! ```text
//! coverwall compose --input urls.txt --output wall.jpg
//! coverwall config set mosaic.columns 8
//! coverwall cache stats
//! ```

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::compose::ComposeArgs;
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "coverwall")]
#[command(version = coverwall::VERSION)]
#[command(about = "Compose cover images into a single cacheable mosaic", long_about = None)]
struct Cli {
    /// Mirror debug-level logs to stdout
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch images and write the mosaic JPEG
    Compose(ComposeArgs),

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect or clear the disk fetch cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Compose(args) => {
            let runner = CliRunner::with_debug(cli.debug)?;
            commands::compose::run(args, &runner)
        }
        Commands::Config { command } => commands::config::run(command),
        Commands::Cache { action } => {
            let runner = CliRunner::with_debug(cli.debug)?;
            runner.log_startup("cache");
            commands::cache::run(action, runner.config())
        }
    }
}
