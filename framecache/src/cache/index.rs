//! Per-fingerprint shard index and entry placement.
//!
//! The index file `<fingerprint>_index.json` maps each cache key to the
//! shard holding it. Placement is first-fit in ascending shard-id order:
//! older shards fill up before the shard count grows. There is no
//! free-space index; every placement reloads candidate shards to size
//! them, which is linear in the shard count and acceptable at the scale
//! of one interactive session (tens of shards).

use crate::cache::io::{read_json, write_json_atomic};
use crate::cache::record::{IndexRecord, ShardRecord, FORMAT_VERSION};
use crate::cache::store::ShardStore;
use crate::cache::types::{CacheError, CacheKey, ShardId};
use crate::fingerprint::Fingerprint;
use crate::log::Logger;
use crate::log_warn;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a new entry should be written.
///
/// Produced by [`ShardIndex::place_for_write`] and committed by the cache
/// manager. `record` is the target shard's content with the new entry
/// already merged, so "remove old" and "add new" land in one write when the
/// key stays on its current shard.
#[derive(Debug)]
pub struct Placement {
    /// Target shard for the entry
    pub shard_id: ShardId,
    /// Target shard content including the new entry
    pub record: ShardRecord,
    /// A different shard that must be rewritten without the key's stale
    /// entry, when the key moved shards
    pub displaced: Option<(ShardId, ShardRecord)>,
}

/// Tracks which shard holds each key for a fingerprint.
pub struct ShardIndex {
    root: PathBuf,
    logger: Arc<dyn Logger>,
}

impl ShardIndex {
    /// Create an index layer rooted at `root`.
    pub fn new(root: PathBuf, logger: Arc<dyn Logger>) -> Self {
        Self { root, logger }
    }

    /// Path of the index file for `fingerprint`.
    pub fn index_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}_index.json", fingerprint))
    }

    /// Load a fingerprint's index.
    ///
    /// Returns an empty index when no file exists yet or the file fails to
    /// decode; decode failures are logged at warn level and the file is
    /// left in place. Never errors.
    pub fn load(&self, fingerprint: &Fingerprint) -> IndexRecord {
        let path = self.index_path(fingerprint);
        match read_json::<IndexRecord>(&path) {
            Ok(Some(index)) if index.version == FORMAT_VERSION => index,
            Ok(Some(index)) => {
                log_warn!(
                    self.logger,
                    "index {} has unsupported format version {}, treating as empty",
                    path.display(),
                    index.version
                );
                IndexRecord::new()
            }
            Ok(None) => IndexRecord::new(),
            Err(e) => {
                log_warn!(
                    self.logger,
                    "corrupt index {}, treating as empty: {}",
                    path.display(),
                    e
                );
                IndexRecord::new()
            }
        }
    }

    /// Atomically persist a fingerprint's index.
    pub fn save(&self, fingerprint: &Fingerprint, index: &IndexRecord) -> Result<(), CacheError> {
        write_json_atomic(&self.index_path(fingerprint), index)
    }

    /// Choose where `key -> value` should be stored.
    ///
    /// 1. If the key already has a shard, its stale entry is dropped from
    ///    that shard's record first, logically freeing the space before
    ///    re-placing.
    /// 2. Existing shards are scanned in ascending id order; the first
    ///    whose record still fits `max_shard_size` with the entry merged
    ///    in is selected.
    /// 3. Otherwise a new shard id `max(existing) + 1` is allocated.
    ///
    /// An entry whose record would hold it alone may exceed
    /// `max_shard_size`; a single over-sized entry is accepted rather
    /// than rejected.
    pub fn place_for_write(
        &self,
        store: &ShardStore,
        fingerprint: &Fingerprint,
        index: &IndexRecord,
        key: &CacheKey,
        value: &Value,
        max_shard_size: usize,
    ) -> Result<Placement, CacheError> {
        // Step 1: logically evict the stale entry from its current shard.
        let stale = index.shard_for(key).map(|id| {
            let mut record = store.read(fingerprint, id);
            record.remove(key);
            (id, record)
        });

        // Step 2: first-fit scan, ascending.
        let shard_ids = index.shard_ids();
        for id in &shard_ids {
            let mut candidate = match &stale {
                Some((stale_id, record)) if stale_id == id => record.clone(),
                _ => store.read(fingerprint, *id),
            };
            candidate.insert(key.clone(), value.clone());

            let fits = store.estimate_size(&candidate)? <= max_shard_size
                || candidate.len() == 1;
            if fits {
                let displaced = match stale {
                    Some((stale_id, record)) if stale_id != *id => Some((stale_id, record)),
                    _ => None,
                };
                return Ok(Placement {
                    shard_id: *id,
                    record: candidate,
                    displaced,
                });
            }
        }

        // Step 3: grow the shard count.
        let shard_id = shard_ids
            .last()
            .map(|id| id.next())
            .unwrap_or(ShardId::FIRST);
        let mut record = ShardRecord::new();
        record.insert(key.clone(), value.clone());
        Ok(Placement {
            shard_id,
            record,
            displaced: stale,
        })
    }
}
