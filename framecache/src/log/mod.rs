//! Logging abstraction for cache components.
//!
//! The cache is strictly best-effort: hits, misses, corrupt files, and
//! failed writes are *reported*, never raised. Components therefore hold an
//! `Arc<dyn Logger>` (injected at construction) rather than calling a
//! logging backend directly, which keeps the core decoupled from `tracing`
//! and lets tests run silent with [`NoOpLogger`].
//!
//! - [`Logger`]: the narrow interface the cache core logs through
//! - [`TracingLogger`]: production adapter delegating to the `tracing` crate
//! - [`NoOpLogger`]: discards everything; for tests and benchmarks
//!
//! Use the `log_info!` / `log_warn!` / `log_error!` macros for format-string
//! ergonomics:
//!
//! ```
//! use framecache::log::{Logger, NoOpLogger};
//! use framecache::log_info;
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "cache hit for {}", "stats_summary");
//! ```

mod noop;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
