//! Configuration for the cache subsystem.
//!
//! Everything tunable lives in [`CacheConfig`]: the global enable flag,
//! fingerprint sampling, the shard size bound, and the cache root. Values
//! come from explicit builder calls or from the environment
//! (`ENABLE_CACHE`, `ENABLE_SAMPLE`, `MAX_SHARD_SIZE`, `FRAMECACHE_DIR`).

mod settings;
mod size;

pub use settings::{
    CacheConfig, DEFAULT_MAX_SHARD_SIZE, DEFAULT_SAMPLE_SIZE, ENV_CACHE_DIR, ENV_ENABLE_CACHE,
    ENV_ENABLE_SAMPLE, ENV_MAX_SHARD_SIZE,
};
pub use size::{format_size, parse_size, SizeParseError};
