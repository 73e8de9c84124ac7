//! Whole-cache maintenance operations on the cache directory.
//!
//! These work directly on the on-disk layout (`<fp>_index.json`,
//! `<fp>_data_<id>.json`) so the CLI can run them without constructing a
//! full cache manager. Files that do not match the cache naming scheme are
//! never touched.

use crate::cache::types::CacheError;
use std::fs;
use std::path::Path;

/// Result of clearing the cache directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearOutcome {
    /// Number of index and shard files deleted
    pub files_deleted: usize,
    /// Total bytes those files occupied
    pub bytes_freed: u64,
}

/// Whether `name` follows the cache file naming scheme.
pub(crate) fn is_cache_file(name: &str) -> bool {
    name.ends_with("_index.json")
        || (name.ends_with(".json") && name.contains("_data_"))
}

/// Delete every index and shard file under `cache_dir`.
///
/// Irreversible and whole-cache only; there is no per-key eviction.
/// Individual deletions that fail are skipped (the next `clear` retries
/// them); a missing cache directory counts as already clear.
///
/// # Errors
///
/// Returns an error only when the directory itself cannot be listed.
pub fn clear_cache_dir(cache_dir: &Path) -> Result<ClearOutcome, CacheError> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ClearOutcome::default()),
        Err(e) => return Err(e.into()),
    };

    let mut outcome = ClearOutcome::default();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_cache_file(name) {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if fs::remove_file(entry.path()).is_ok() {
            outcome.files_deleted += 1;
            outcome.bytes_freed += size;
        }
    }
    Ok(outcome)
}

/// Count cache files and their total size under `cache_dir`.
///
/// # Errors
///
/// Returns an error only when the directory itself cannot be listed; a
/// missing directory reports zero files.
pub fn cache_dir_stats(cache_dir: &Path) -> Result<(usize, u64), CacheError> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(e.into()),
    };

    let mut files = 0;
    let mut bytes = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_cache_file(name) {
            continue;
        }
        files += 1;
        bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }
    Ok((files, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_naming() {
        assert!(is_cache_file("abc123_index.json"));
        assert!(is_cache_file("abc123_data_1.json"));
        assert!(is_cache_file("empty-dataset_data_12.json"));
        assert!(!is_cache_file("notes.txt"));
        assert!(!is_cache_file("abc123_data_1.json.tmp"));
        assert!(!is_cache_file("unrelated.json"));
    }

    #[test]
    fn test_clear_missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = clear_cache_dir(&dir.path().join("does-not-exist")).unwrap();
        assert_eq!(outcome.files_deleted, 0);
    }

    #[test]
    fn test_clear_removes_only_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fp_index.json"), b"{}").unwrap();
        fs::write(dir.path().join("fp_data_1.json"), b"{}").unwrap();
        fs::write(dir.path().join("keep.txt"), b"keep me").unwrap();

        let outcome = clear_cache_dir(dir.path()).unwrap();
        assert_eq!(outcome.files_deleted, 2);
        assert!(dir.path().join("keep.txt").exists());
        assert!(!dir.path().join("fp_index.json").exists());
    }

    #[test]
    fn test_stats_counts_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fp_index.json"), b"12345").unwrap();
        fs::write(dir.path().join("fp_data_1.json"), b"1234567890").unwrap();
        fs::write(dir.path().join("other.bin"), b"xx").unwrap();

        let (files, bytes) = cache_dir_stats(dir.path()).unwrap();
        assert_eq!(files, 2);
        assert_eq!(bytes, 15);
    }
}
