//! CLI error handling with user-friendly messages.

use framecache::cache::CacheError;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error (bad environment variable)
    Config(CacheError),
    /// No index file exists for the requested fingerprint
    NoSuchFingerprint { fingerprint: String, dir: PathBuf },
    /// A cache file exists but cannot be read or parsed
    Unreadable { path: PathBuf, reason: String },
    /// Failed to write the requested dump file
    OutputWrite { path: PathBuf, error: std::io::Error },
    /// A maintenance operation failed
    Maintenance(CacheError),
}

impl CliError {
    /// Exit the process with an error message and a non-zero code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::NoSuchFingerprint { dir, .. } = self {
            eprintln!();
            eprintln!("To see what is cached there, run:");
            eprintln!("  framecache stats --cache-dir {}", dir.display());
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::NoSuchFingerprint { fingerprint, dir } => write!(
                f,
                "No cache found for fingerprint '{}' in {}",
                fingerprint,
                dir.display()
            ),
            CliError::Unreadable { path, reason } => {
                write!(f, "Cannot read {}: {}", path.display(), reason)
            }
            CliError::OutputWrite { path, error } => {
                write!(f, "Failed to write {}: {}", path.display(), error)
            }
            CliError::Maintenance(e) => write!(f, "{}", e),
        }
    }
}
