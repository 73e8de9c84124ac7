//! FrameCache - content-addressed result caching for tabular analytics
//!
//! This library memoizes expensive computations (statistical summaries,
//! correlation matrices, model feature importances, rendered plot data)
//! keyed by the *content* of the dataset they were derived from. Results
//! are held in a process-local memory tier and persisted to size-bounded
//! shard files on disk, so a dataset reloaded in a later session still
//! hits the cache.
//!
//! # High-Level API
//!
//! ```
//! use framecache::cache::{CacheKey, CacheManager};
//! use framecache::config::CacheConfig;
//! use framecache::dataset::{Column, Table};
//! use framecache::log::NoOpLogger;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = CacheConfig::default().with_cache_dir(dir.path().to_path_buf());
//! let cache = CacheManager::new(config, Arc::new(NoOpLogger)).unwrap();
//!
//! let table = Table::new(vec![Column::int("id", vec![1, 2, 3])]).unwrap();
//! let key = CacheKey::new("stats_summary");
//!
//! if cache.get(&key, &table).is_none() {
//!     let result = json!({ "mean": 2.0 });
//!     cache.put(&key, &table, result);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod fingerprint;
pub mod log;
pub mod logging;

/// Version of the FrameCache library and CLI.
///
/// Synchronized across all components in the workspace; the value is
/// defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
