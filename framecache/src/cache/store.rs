//! Shard persistence: bounded-size blob files on disk.
//!
//! One shard file holds the entries of one [`ShardRecord`] for one
//! fingerprint, named `<fingerprint>_data_<id>.json` under the cache root.
//! Reads never fail: a missing file is an empty record and a corrupt file
//! is logged and likewise treated as empty ("no entries in this shard").
//! Corrupt files are left in place for inspection; only `clear` removes
//! them. Writes go through a temp file and rename so concurrent readers
//! never observe a partial shard.

use crate::cache::io::{read_json, write_json_atomic};
use crate::cache::record::{ShardRecord, FORMAT_VERSION};
use crate::cache::types::{CacheError, ShardId};
use crate::fingerprint::Fingerprint;
use crate::log::Logger;
use crate::log_warn;
use std::path::PathBuf;
use std::sync::Arc;

/// Reads and writes shard files for the cache manager.
pub struct ShardStore {
    root: PathBuf,
    logger: Arc<dyn Logger>,
}

impl ShardStore {
    /// Create a store rooted at `root`. The directory is created on the
    /// first write, not here.
    pub fn new(root: PathBuf, logger: Arc<dyn Logger>) -> Self {
        Self { root, logger }
    }

    /// Path of the shard file for `(fingerprint, id)`.
    pub fn shard_path(&self, fingerprint: &Fingerprint, id: ShardId) -> PathBuf {
        self.root
            .join(format!("{}_data_{}.json", fingerprint, id))
    }

    /// Load a shard record.
    ///
    /// Returns an empty record when the file does not exist or fails to
    /// decode; decode failures are logged at warn level. Never errors.
    pub fn read(&self, fingerprint: &Fingerprint, id: ShardId) -> ShardRecord {
        let path = self.shard_path(fingerprint, id);
        match read_json::<ShardRecord>(&path) {
            Ok(Some(record)) if record.version == FORMAT_VERSION => record,
            Ok(Some(record)) => {
                log_warn!(
                    self.logger,
                    "shard {} has unsupported format version {}, treating as empty",
                    path.display(),
                    record.version
                );
                ShardRecord::new()
            }
            Ok(None) => ShardRecord::new(),
            Err(e) => {
                log_warn!(
                    self.logger,
                    "corrupt shard {}, treating as empty: {}",
                    path.display(),
                    e
                );
                ShardRecord::new()
            }
        }
    }

    /// Atomically persist a shard record.
    pub fn write(
        &self,
        fingerprint: &Fingerprint,
        id: ShardId,
        record: &ShardRecord,
    ) -> Result<(), CacheError> {
        write_json_atomic(&self.shard_path(fingerprint, id), record)
    }

    /// Serialized byte size of a record, without persisting it.
    ///
    /// Used by placement to decide whether an entry fits a candidate shard.
    pub fn estimate_size(&self, record: &ShardRecord) -> Result<usize, CacheError> {
        Ok(serde_json::to_vec(record)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::types::CacheKey;
    use crate::dataset::{Column, Table};
    use crate::fingerprint::Fingerprinter;
    use crate::log::NoOpLogger;
    use serde_json::json;
    use std::fs;

    fn fingerprint() -> Fingerprint {
        let table = Table::new(vec![Column::int("id", vec![1, 2, 3])]).unwrap();
        Fingerprinter::new(false, 10).compute(&table)
    }

    fn store(dir: &std::path::Path) -> ShardStore {
        ShardStore::new(dir.to_path_buf(), Arc::new(NoOpLogger))
    }

    #[test]
    fn test_read_missing_shard_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let record = store(dir.path()).read(&fingerprint(), ShardId::FIRST);
        assert!(record.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fp = fingerprint();

        let mut record = ShardRecord::new();
        record.insert(CacheKey::new("k"), json!({"mean": 5}));
        store.write(&fp, ShardId::FIRST, &record).unwrap();

        assert_eq!(store.read(&fp, ShardId::FIRST), record);
    }

    #[test]
    fn test_corrupt_shard_reads_empty_and_stays_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fp = fingerprint();
        let path = store.shard_path(&fp, ShardId::FIRST);

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(&path, b"{definitely not json").unwrap();

        assert!(store.read(&fp, ShardId::FIRST).is_empty());
        // Left in place for forensic inspection
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_version_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fp = fingerprint();
        let path = store.shard_path(&fp, ShardId::FIRST);

        fs::write(&path, b"{\"version\":99,\"entries\":{}}").unwrap();
        assert!(store.read(&fp, ShardId::FIRST).is_empty());
    }

    #[test]
    fn test_shard_path_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fp = fingerprint();
        let path = store.shard_path(&fp, ShardId::new(3));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}_data_3.json", fp)
        );
    }

    #[test]
    fn test_estimate_size_matches_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fp = fingerprint();

        let mut record = ShardRecord::new();
        record.insert(CacheKey::new("k"), json!([1, 2, 3, 4, 5]));
        let estimated = store.estimate_size(&record).unwrap();

        store.write(&fp, ShardId::FIRST, &record).unwrap();
        let on_disk = fs::metadata(store.shard_path(&fp, ShardId::FIRST))
            .unwrap()
            .len() as usize;
        assert_eq!(estimated, on_disk);
    }
}
