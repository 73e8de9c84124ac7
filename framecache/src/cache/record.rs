//! Persisted record formats for shard and index files.
//!
//! Both records serialize as versioned JSON documents so the companion
//! inspection tool (and anything else) can read the cache directory with a
//! plain JSON parser, independent of this implementation. Values are
//! [`serde_json::Value`], which keeps payloads self-describing instead of a
//! language-native object dump.

use crate::cache::types::{CacheKey, ShardId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// On-disk format version for shard and index files.
///
/// Bump only with a migration path for the inspection tooling; files with
/// an unknown version are treated as corrupt (empty).
pub const FORMAT_VERSION: u32 = 1;

/// Entries of one shard file: `CacheKey -> Value`.
///
/// Bounded so the serialized size stays under the configured maximum,
/// except when a single entry alone exceeds the bound (accepted edge case).
/// `BTreeMap` keeps serialization order stable for diff-friendly files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardRecord {
    /// Format version, always [`FORMAT_VERSION`]
    pub version: u32,
    /// Cached values keyed by computation
    pub entries: BTreeMap<CacheKey, Value>,
}

impl Default for ShardRecord {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl ShardRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached value.
    pub fn get(&self, key: &CacheKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: CacheKey, value: Value) {
        self.entries.insert(key, value);
    }

    /// Remove an entry, returning its value if present.
    pub fn remove(&mut self, key: &CacheKey) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Whether the record holds `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One fingerprint's index: `CacheKey -> ShardId`.
///
/// Created lazily on first `put`, rewritten on every subsequent `put`,
/// deleted only by `clear`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Format version, always [`FORMAT_VERSION`]
    pub version: u32,
    /// Shard assignment per key
    pub entries: BTreeMap<CacheKey, ShardId>,
}

impl Default for IndexRecord {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl IndexRecord {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shard currently holding `key`, if any.
    pub fn shard_for(&self, key: &CacheKey) -> Option<ShardId> {
        self.entries.get(key).copied()
    }

    /// Record that `key` now lives in `shard`.
    pub fn assign(&mut self, key: CacheKey, shard: ShardId) {
        self.entries.insert(key, shard);
    }

    /// Distinct shard ids referenced by the index, ascending.
    pub fn shard_ids(&self) -> Vec<ShardId> {
        let mut ids: Vec<ShardId> = self.entries.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shard_record_insert_get_remove() {
        let mut record = ShardRecord::new();
        let key = CacheKey::new("stats_summary");
        assert!(record.is_empty());

        record.insert(key.clone(), json!({"mean": 5}));
        assert_eq!(record.get(&key), Some(&json!({"mean": 5})));
        assert_eq!(record.len(), 1);

        assert_eq!(record.remove(&key), Some(json!({"mean": 5})));
        assert!(!record.contains(&key));
    }

    #[test]
    fn test_shard_record_json_is_self_describing() {
        let mut record = ShardRecord::new();
        record.insert(CacheKey::new("k"), json!([1, 2, 3]));

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(
            text,
            format!("{{\"version\":{},\"entries\":{{\"k\":[1,2,3]}}}}", FORMAT_VERSION)
        );

        let back: ShardRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_index_record_assignment() {
        let mut index = IndexRecord::new();
        let key = CacheKey::new("correlation_matrix");
        assert_eq!(index.shard_for(&key), None);

        index.assign(key.clone(), ShardId::new(2));
        assert_eq!(index.shard_for(&key), Some(ShardId::new(2)));

        // Re-assignment replaces, never duplicates
        index.assign(key.clone(), ShardId::new(3));
        assert_eq!(index.shard_for(&key), Some(ShardId::new(3)));
    }

    #[test]
    fn test_index_shard_ids_sorted_and_deduped() {
        let mut index = IndexRecord::new();
        index.assign(CacheKey::new("a"), ShardId::new(3));
        index.assign(CacheKey::new("b"), ShardId::new(1));
        index.assign(CacheKey::new("c"), ShardId::new(3));
        assert_eq!(index.shard_ids(), vec![ShardId::new(1), ShardId::new(3)]);
    }
}
