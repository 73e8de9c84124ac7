//! Multi-tier, content-addressed result cache.
//!
//! Composition, leaves first: the [`fingerprint`](crate::fingerprint)
//! module derives a dataset's identity; [`ShardStore`] persists bounded
//! blob files; [`ShardIndex`] maps keys to shards and places new entries;
//! [`CacheManager`] orchestrates the tiers behind the public
//! `get`/`put`/`clear` API.
//!
//! On-disk layout under the cache root:
//!
//! ```text
//! <fingerprint>_index.json     one index record per fingerprint
//! <fingerprint>_data_<id>.json one shard record per (fingerprint, shard)
//! ```
//!
//! Both file kinds are versioned JSON, readable by the companion
//! `framecache-cli` inspector without going through this crate.

mod index;
mod io;
mod maintenance;
mod manager;
mod record;
mod stats;
mod store;
mod r#trait;
mod types;

pub use index::{Placement, ShardIndex};
pub use maintenance::{cache_dir_stats, clear_cache_dir, ClearOutcome};
pub use manager::CacheManager;
pub use record::{IndexRecord, ShardRecord, FORMAT_VERSION};
pub use stats::CacheStats;
pub use store::ShardStore;
pub use r#trait::{Cache, NoOpCache};
pub use types::{CacheError, CacheKey, ShardId};
