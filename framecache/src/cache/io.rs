//! Shared file I/O helpers for shard and index persistence.

use crate::cache::types::CacheError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read and decode a JSON file.
///
/// Distinguishes "file absent" (`Ok(None)`) from decode or I/O failures so
/// callers can demote corruption to an empty record with a warning.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CacheError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Serialize a value to JSON and atomically replace `path` with it.
///
/// Writes to a temporary file in the same directory and renames it over the
/// target, so a concurrent reader sees either the old file or the new one,
/// never a partial write.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut tmp, value)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| CacheError::Io(e.error))?;
    Ok(())
}
