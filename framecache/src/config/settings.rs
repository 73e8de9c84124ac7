//! Cache configuration.

use super::size::parse_size;
use crate::cache::CacheError;
use std::env;
use std::path::PathBuf;

/// Default maximum serialized size of one shard file (2 MB).
pub const DEFAULT_MAX_SHARD_SIZE: usize = 2 * 1024 * 1024;

/// Default rows per fingerprint sample slice.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Environment variable toggling the whole cache.
pub const ENV_ENABLE_CACHE: &str = "ENABLE_CACHE";

/// Environment variable toggling fingerprint sampling.
pub const ENV_ENABLE_SAMPLE: &str = "ENABLE_SAMPLE";

/// Environment variable overriding the shard size bound.
pub const ENV_MAX_SHARD_SIZE: &str = "MAX_SHARD_SIZE";

/// Environment variable overriding the cache root directory.
pub const ENV_CACHE_DIR: &str = "FRAMECACHE_DIR";

/// Cache configuration.
///
/// Built explicitly with the `with_*` methods or loaded from the
/// environment via [`CacheConfig::from_env`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether caching is active; when false `get` always misses and
    /// `put` is a no-op
    pub enabled: bool,
    /// Fingerprint sampling mode; off means exact content hashing
    pub sampling: bool,
    /// Maximum serialized bytes per shard file
    pub max_shard_size: usize,
    /// Rows per fingerprint sample slice
    pub sample_size: usize,
    /// Cache root directory
    pub cache_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("framecache");

        Self {
            enabled: true,
            sampling: false,
            max_shard_size: DEFAULT_MAX_SHARD_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            cache_dir,
        }
    }
}

impl CacheConfig {
    /// Load configuration from the environment, starting from defaults.
    ///
    /// Reads `ENABLE_CACHE`, `ENABLE_SAMPLE`, `MAX_SHARD_SIZE` (bytes or
    /// human-readable like "64KB"), and `FRAMECACHE_DIR`. Unset variables
    /// keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] when a variable is set to an
    /// unparseable value.
    pub fn from_env() -> Result<Self, CacheError> {
        let mut config = Self::default();

        if let Ok(value) = env::var(ENV_ENABLE_CACHE) {
            config.enabled = parse_bool(ENV_ENABLE_CACHE, &value)?;
        }
        if let Ok(value) = env::var(ENV_ENABLE_SAMPLE) {
            config.sampling = parse_bool(ENV_ENABLE_SAMPLE, &value)?;
        }
        if let Ok(value) = env::var(ENV_MAX_SHARD_SIZE) {
            config.max_shard_size = parse_size(&value).map_err(|e| {
                CacheError::InvalidConfig(format!("{}: {}", ENV_MAX_SHARD_SIZE, e))
            })?;
        }
        if let Ok(value) = env::var(ENV_CACHE_DIR) {
            config.cache_dir = PathBuf::from(value);
        }

        Ok(config)
    }

    /// Enable or disable caching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable or disable fingerprint sampling.
    pub fn with_sampling(mut self, sampling: bool) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the maximum shard size in bytes.
    pub fn with_max_shard_size(mut self, bytes: usize) -> Self {
        self.max_shard_size = bytes;
        self
    }

    /// Set the rows per fingerprint sample slice.
    pub fn with_sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }

    /// Set the cache root directory.
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, CacheError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CacheError::InvalidConfig(format!(
            "{}: expected a boolean, got '{}'",
            var, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert!(!config.sampling);
        assert_eq!(config.max_shard_size, DEFAULT_MAX_SHARD_SIZE);
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
        assert!(config.cache_dir.ends_with("framecache"));
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::default()
            .with_enabled(false)
            .with_sampling(true)
            .with_max_shard_size(64 * 1024)
            .with_sample_size(100)
            .with_cache_dir(PathBuf::from("/tmp/fc"));

        assert!(!config.enabled);
        assert!(config.sampling);
        assert_eq!(config.max_shard_size, 64 * 1024);
        assert_eq!(config.sample_size, 100);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/fc"));
    }

    #[test]
    fn test_from_env_overrides_defaults() {
        // No other test touches these variables, so mutating the process
        // environment here is safe even under the parallel test runner.
        env::set_var(ENV_ENABLE_CACHE, "off");
        env::set_var(ENV_ENABLE_SAMPLE, "1");
        env::set_var(ENV_MAX_SHARD_SIZE, "64KB");
        env::set_var(ENV_CACHE_DIR, "/tmp/framecache-env-test");

        let config = CacheConfig::from_env().unwrap();
        assert!(!config.enabled);
        assert!(config.sampling);
        assert_eq!(config.max_shard_size, 64 * 1024);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/framecache-env-test"));

        env::set_var(ENV_MAX_SHARD_SIZE, "not a size");
        assert!(CacheConfig::from_env().is_err());

        for var in [
            ENV_ENABLE_CACHE,
            ENV_ENABLE_SAMPLE,
            ENV_MAX_SHARD_SIZE,
            ENV_CACHE_DIR,
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_bool_accepts_common_forms() {
        for value in ["1", "true", "YES", "On"] {
            assert!(parse_bool("X", value).unwrap());
        }
        for value in ["0", "false", "NO", "Off"] {
            assert!(!parse_bool("X", value).unwrap());
        }
        assert!(parse_bool("X", "maybe").is_err());
    }
}
