//! Cache manager: the public get/put/clear orchestrator.
//!
//! Composes the fingerprinter, shard index, and shard store, and owns the
//! process-local memory tier. One manager instance is constructed at
//! process start and shared (`Arc`) by every computation caller; there is
//! no global singleton.
//!
//! Concurrency model: `get` only reads shared structures and needs no
//! exclusive lock because shard writes are atomic (a reader sees the old
//! or the new file, never half of one). `put` takes a single process-wide
//! lock for its whole read-modify-write sequence, serializing all writers
//! across all fingerprints. That trades write throughput for simplicity;
//! a per-fingerprint lock map would raise concurrency without changing
//! this contract.

use crate::cache::index::ShardIndex;
use crate::cache::maintenance::{clear_cache_dir, ClearOutcome};
use crate::cache::record::ShardRecord;
use crate::cache::stats::CacheStats;
use crate::cache::store::ShardStore;
use crate::cache::types::{CacheError, CacheKey};
use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::dataset::Dataset;
use crate::fingerprint::Fingerprinter;
use crate::log::Logger;
use crate::{log_debug, log_error, log_info, log_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Multi-tier result cache keyed by (dataset content, computation identity).
///
/// All failure handling is best-effort by contract: `get` and `put` never
/// return errors and never panic on cache trouble. A broken cache only ever
/// costs a recomputation, never a failed user operation.
pub struct CacheManager {
    config: CacheConfig,
    fingerprinter: Fingerprinter,
    store: ShardStore,
    index: ShardIndex,
    /// Memory tier: shard file path -> deserialized record. Populated
    /// lazily by `get`/`put`, wiped wholesale by `clear`.
    memory: Mutex<HashMap<PathBuf, ShardRecord>>,
    /// Serializes every put's read-modify-write sequence.
    write_lock: Mutex<()>,
    stats: Mutex<CacheStats>,
    logger: Arc<dyn Logger>,
}

impl CacheManager {
    /// Create a cache manager from configuration.
    ///
    /// Ensures the cache root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache directory cannot be created.
    pub fn new(config: CacheConfig, logger: Arc<dyn Logger>) -> Result<Self, CacheError> {
        fs::create_dir_all(&config.cache_dir)?;
        log_info!(
            logger,
            "cache initialized at {} (enabled: {}, sampling: {})",
            config.cache_dir.display(),
            config.enabled,
            config.sampling
        );

        let fingerprinter = Fingerprinter::new(config.sampling, config.sample_size);
        let store = ShardStore::new(config.cache_dir.clone(), logger.clone());
        let index = ShardIndex::new(config.cache_dir.clone(), logger.clone());

        Ok(Self {
            config,
            fingerprinter,
            store,
            index,
            memory: Mutex::new(HashMap::new()),
            write_lock: Mutex::new(()),
            stats: Mutex::new(CacheStats::new()),
            logger,
        })
    }

    /// Whether caching is active.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a cached value for `key` under `dataset`'s fingerprint.
    ///
    /// Checks the memory tier before reading the key's shard from disk.
    /// Returns `None` on any miss, on any I/O or decode failure, and
    /// whenever caching is disabled.
    pub fn get(&self, key: &CacheKey, dataset: &dyn Dataset) -> Option<Value> {
        if !self.config.enabled {
            self.with_stats(|s| s.record_miss());
            return None;
        }

        let fingerprint = self.fingerprinter.compute(dataset);
        let index = self.index.load(&fingerprint);
        let Some(shard_id) = index.shard_for(key) else {
            log_debug!(self.logger, "cache miss for {}", key);
            self.with_stats(|s| s.record_miss());
            return None;
        };

        let path = self.store.shard_path(&fingerprint, shard_id);
        if let Ok(memory) = self.memory.lock() {
            if let Some(value) = memory.get(&path).and_then(|record| record.get(key)) {
                log_debug!(self.logger, "cache hit (memory) for {}", key);
                self.with_stats(|s| s.record_memory_hit());
                return Some(value.clone());
            }
        }

        let record = self.store.read(&fingerprint, shard_id);
        match record.get(key).cloned() {
            Some(value) => {
                if let Ok(mut memory) = self.memory.lock() {
                    memory.insert(path, record);
                }
                log_debug!(self.logger, "cache hit (disk) for {}", key);
                self.with_stats(|s| s.record_disk_hit());
                Some(value)
            }
            None => {
                // Index pointed at a shard that no longer holds the key
                // (corrupt shard, or an earlier partial failure).
                log_debug!(self.logger, "cache miss for {} (shard {})", key, shard_id);
                self.with_stats(|s| s.record_miss());
                None
            }
        }
    }

    /// Look up and decode a cached value.
    ///
    /// A value that fails to decode as `T` is a miss, not an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &CacheKey, dataset: &dyn Dataset) -> Option<T> {
        let value = self.get(key, dataset)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log_warn!(
                    self.logger,
                    "cached value for {} does not decode, treating as miss: {}",
                    key,
                    e
                );
                None
            }
        }
    }

    /// Store a computed value for `key` under `dataset`'s fingerprint.
    ///
    /// The whole placement/write/index sequence runs under the process-wide
    /// write lock. Failures are logged and swallowed; a failed write leaves
    /// the cache in its pre-write state for this key and the next `get`
    /// simply misses.
    pub fn put(&self, key: &CacheKey, dataset: &dyn Dataset, value: Value) {
        if !self.config.enabled {
            return;
        }

        let _guard = self.lock_writes();
        let fingerprint = self.fingerprinter.compute(dataset);
        let mut index = self.index.load(&fingerprint);

        let placement = match self.index.place_for_write(
            &self.store,
            &fingerprint,
            &index,
            key,
            &value,
            self.config.max_shard_size,
        ) {
            Ok(placement) => placement,
            Err(e) => {
                log_error!(self.logger, "cache placement failed for {}: {}", key, e);
                self.with_stats(|s| s.record_write_failure());
                return;
            }
        };

        if let Err(e) = self
            .store
            .write(&fingerprint, placement.shard_id, &placement.record)
        {
            log_error!(self.logger, "cache write failed for {}: {}", key, e);
            self.with_stats(|s| s.record_write_failure());
            return;
        }

        // The key moved shards: rewrite its old shard without the stale
        // entry. If this fails the orphan entry stays on disk unreferenced
        // by the index; harmless, and clear() removes it eventually.
        if let Some((old_id, old_record)) = &placement.displaced {
            if let Err(e) = self.store.write(&fingerprint, *old_id, old_record) {
                log_warn!(
                    self.logger,
                    "stale entry for {} left orphaned in shard {}: {}",
                    key,
                    old_id,
                    e
                );
            }
        }

        index.assign(key.clone(), placement.shard_id);
        if let Err(e) = self.index.save(&fingerprint, &index) {
            log_error!(self.logger, "index write failed for {}: {}", key, e);
            self.with_stats(|s| s.record_write_failure());
            return;
        }

        if let Ok(mut memory) = self.memory.lock() {
            let path = self.store.shard_path(&fingerprint, placement.shard_id);
            memory.insert(path, placement.record);
            if let Some((old_id, old_record)) = placement.displaced {
                memory.insert(self.store.shard_path(&fingerprint, old_id), old_record);
            }
        }

        log_debug!(
            self.logger,
            "cache stored {} in shard {}",
            key,
            placement.shard_id
        );
        self.with_stats(|s| s.record_write());
    }

    /// Encode and store a computed value.
    ///
    /// Values that fail to encode are logged and dropped.
    pub fn put_as<T: Serialize>(&self, key: &CacheKey, dataset: &dyn Dataset, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.put(key, dataset, encoded),
            Err(e) => {
                log_error!(self.logger, "value for {} does not encode: {}", key, e);
                self.with_stats(|s| s.record_write_failure());
            }
        }
    }

    /// Delete every index and shard file under the cache root and empty
    /// the memory tier. Irreversible, whole-cache only.
    pub fn clear(&self) -> Result<ClearOutcome, CacheError> {
        let _guard = self.lock_writes();
        if let Ok(mut memory) = self.memory.lock() {
            memory.clear();
        }
        let outcome = clear_cache_dir(&self.config.cache_dir)?;
        log_info!(
            self.logger,
            "cache cleared: {} files deleted",
            outcome.files_deleted
        );
        Ok(outcome)
    }

    /// Snapshot of the hit/miss/write counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Acquire the write lock, recovering it if a writer panicked.
    ///
    /// The guarded state (index and shard files) is rewritten whole on
    /// every put, so a poisoned lock does not imply torn data.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn with_stats(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}

impl Cache for CacheManager {
    fn get(&self, key: &CacheKey, dataset: &dyn Dataset) -> Option<Value> {
        CacheManager::get(self, key, dataset)
    }

    fn put(&self, key: &CacheKey, dataset: &dyn Dataset, value: Value) {
        CacheManager::put(self, key, dataset, value)
    }

    fn clear(&self) -> Result<ClearOutcome, CacheError> {
        CacheManager::clear(self)
    }

    fn stats(&self) -> CacheStats {
        CacheManager::stats(self)
    }
}
