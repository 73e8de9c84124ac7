//! Cache statistics tracking.

/// Counters for cache behavior, split by tier.
///
/// Snapshot type: the manager keeps one behind a mutex and hands out
/// clones. Purely observational; nothing in the cache reads these back.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Hits served from the in-process memory tier
    pub memory_hits: u64,
    /// Hits that required a shard read from disk
    pub disk_hits: u64,
    /// Lookups that found nothing (including disabled-cache lookups)
    pub misses: u64,
    /// Successful shard writes
    pub writes: u64,
    /// Shard or index writes that failed and were swallowed
    pub write_failures: u64,
}

impl CacheStats {
    /// Create a zeroed statistics record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lookups observed.
    pub fn lookups(&self) -> u64 {
        self.memory_hits + self.disk_hits + self.misses
    }

    /// Overall hit rate (0.0 to 1.0), both tiers combined.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            (self.memory_hits + self.disk_hits) as f64 / lookups as f64
        }
    }

    pub(crate) fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub(crate) fn record_disk_hit(&mut self) {
        self.disk_hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_write(&mut self) {
        self.writes += 1;
    }

    pub(crate) fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }
}
