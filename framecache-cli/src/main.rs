//! FrameCache CLI - inspect and manage on-disk result caches.
//!
//! The cache's files are versioned JSON precisely so they can be examined
//! without going through the library; this binary is that companion
//! inspector, plus the whole-cache maintenance commands.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use framecache::config::CacheConfig;
use std::path::PathBuf;

use error::CliError;

#[derive(Parser)]
#[command(name = "framecache", version)]
#[command(about = "Inspect and manage FrameCache cache directories", long_about = None)]
struct Cli {
    /// Cache directory (defaults to FRAMECACHE_DIR or the platform cache dir)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Log to logs/framecache.log and stderr (filter via RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the index and every shard for one fingerprint
    Inspect {
        /// Fingerprint whose files to inspect
        fingerprint: String,

        /// Write the combined dump to this file as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Show cache file and size totals
    Stats,

    /// Delete every index and shard file in the cache
    Clear,
}

fn main() {
    let cli = Cli::parse();

    let _logging_guard = if cli.verbose {
        match framecache::logging::init_logging(
            framecache::logging::default_log_dir(),
            framecache::logging::default_log_file(),
        ) {
            Ok(guard) => Some(guard),
            Err(e) => CliError::LoggingInit(e.to_string()).exit(),
        }
    } else {
        None
    };

    let cache_dir = match cli.cache_dir {
        Some(dir) => dir,
        None => match CacheConfig::from_env() {
            Ok(config) => config.cache_dir,
            Err(e) => CliError::Config(e).exit(),
        },
    };

    let result = match cli.command {
        Command::Inspect {
            fingerprint,
            output,
            compact,
        } => commands::inspect::run(&cache_dir, &fingerprint, output.as_deref(), compact),
        Command::Stats => commands::stats::run(&cache_dir),
        Command::Clear => commands::clear::run(&cache_dir),
    };

    if let Err(e) = result {
        e.exit();
    }
}
