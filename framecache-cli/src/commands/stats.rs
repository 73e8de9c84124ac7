//! Show cache file and size totals.

use crate::error::CliError;
use framecache::cache::cache_dir_stats;
use framecache::config::format_size;
use std::path::Path;

/// Run the `stats` subcommand.
pub fn run(cache_dir: &Path) -> Result<(), CliError> {
    println!("Cache directory: {}", cache_dir.display());

    let (files, bytes) = cache_dir_stats(cache_dir).map_err(CliError::Maintenance)?;
    println!("  Files: {}", files);
    println!("  Size:  {}", format_size(bytes as usize));
    Ok(())
}
