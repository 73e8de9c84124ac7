//! Core types for the cache subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Cache-related errors.
///
/// These circulate *inside* the crate and surface only from explicit
/// management operations (`clear`, configuration loading). The `get`/`put`
/// paths catch them, log, and degrade to a miss or no-op; a cache failure
/// must never turn a successful computation into a failed one.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode an index or shard record
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Logical key naming one computation and its parameters.
///
/// Unique within a fingerprint's namespace. Conventionally the computation
/// name plus its arguments, e.g. `"correlation_matrix:pearson"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create a new cache key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Identifier of one shard file within a fingerprint's namespace.
///
/// Allocated monotonically per fingerprint, starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShardId(u32);

impl ShardId {
    /// First shard id allocated for a fingerprint.
    pub const FIRST: ShardId = ShardId(1);

    /// Create a shard id. Ids are 1-based; zero is not a valid id.
    pub fn new(id: u32) -> Self {
        debug_assert!(id >= 1, "shard ids start at 1");
        Self(id)
    }

    /// Numeric value of the id.
    pub fn value(self) -> u32 {
        self.0
    }

    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
