//! Delete every index and shard file in the cache.

use crate::error::CliError;
use framecache::cache::clear_cache_dir;
use framecache::config::format_size;
use std::path::Path;

/// Run the `clear` subcommand.
pub fn run(cache_dir: &Path) -> Result<(), CliError> {
    println!("Clearing cache at: {}", cache_dir.display());

    let outcome = clear_cache_dir(cache_dir).map_err(CliError::Maintenance)?;
    println!(
        "Deleted {} files, freed {}",
        outcome.files_deleted,
        format_size(outcome.bytes_freed as usize)
    );
    Ok(())
}
