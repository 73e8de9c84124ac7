//! Cache trait definition for dependency injection.

use crate::cache::maintenance::ClearOutcome;
use crate::cache::stats::CacheStats;
use crate::cache::types::{CacheError, CacheKey};
use crate::dataset::Dataset;
use serde_json::Value;

/// Cache abstraction for computation callers.
///
/// Callers hold a `&dyn Cache` (or `Arc<dyn Cache>`) and follow the same
/// pattern whether the backing implementation caches or not: `get` before
/// computing, `put` after a miss. The "always recompute" path is just this
/// loop against [`NoOpCache`].
///
/// # Example
///
/// ```
/// use framecache::cache::{Cache, CacheKey, NoOpCache};
/// use framecache::dataset::{Column, Table};
/// use serde_json::json;
///
/// fn summarize(cache: &dyn Cache, table: &Table) -> serde_json::Value {
///     let key = CacheKey::new("stats_summary");
///     if let Some(cached) = cache.get(&key, table) {
///         return cached;
///     }
///     let result = json!({"mean": 2.0}); // the expensive part
///     cache.put(&key, table, result.clone());
///     result
/// }
///
/// let table = Table::new(vec![Column::int("id", vec![1, 2, 3])]).unwrap();
/// assert_eq!(summarize(&NoOpCache, &table), json!({"mean": 2.0}));
/// ```
pub trait Cache: Send + Sync {
    /// Look up a cached value. `None` on miss, on any internal failure,
    /// and when caching is disabled.
    fn get(&self, key: &CacheKey, dataset: &dyn Dataset) -> Option<Value>;

    /// Store a computed value. Best-effort; failures are internal.
    fn put(&self, key: &CacheKey, dataset: &dyn Dataset, value: Value);

    /// Remove all cached data, memory and disk.
    fn clear(&self) -> Result<ClearOutcome, CacheError>;

    /// Snapshot of hit/miss/write counters.
    fn stats(&self) -> CacheStats;
}

/// Cache implementation that never caches.
///
/// Always misses on `get` and drops every `put`. Used for tests, for
/// benchmarking computations without caching overhead, and as the injected
/// implementation when a deployment runs cache-less.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl Cache for NoOpCache {
    fn get(&self, _key: &CacheKey, _dataset: &dyn Dataset) -> Option<Value> {
        None
    }

    fn put(&self, _key: &CacheKey, _dataset: &dyn Dataset, _value: Value) {}

    fn clear(&self) -> Result<ClearOutcome, CacheError> {
        Ok(ClearOutcome::default())
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Table};
    use serde_json::json;

    #[test]
    fn test_noop_cache_always_misses() {
        let cache = NoOpCache;
        let table = Table::new(vec![Column::int("id", vec![1])]).unwrap();
        let key = CacheKey::new("k");

        cache.put(&key, &table, json!(1));
        assert_eq!(cache.get(&key, &table), None);
        assert_eq!(cache.stats().lookups(), 0);
    }

    #[test]
    fn test_noop_cache_clear_is_noop() {
        let outcome = NoOpCache.clear().unwrap();
        assert_eq!(outcome.files_deleted, 0);
    }
}
