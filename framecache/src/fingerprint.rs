//! Dataset content fingerprinting.
//!
//! A fingerprint is the cache namespace for one dataset state: identical
//! content always hashes to the same digest, and any content change moves
//! every cached result for that dataset out of reach without touching the
//! old files. Fingerprints are recomputed from the dataset on every access
//! and never persisted on their own.
//!
//! Two modes exist:
//!
//! - **Exact** (default): the full canonical serialization is hashed.
//!   Changing any single cell changes the fingerprint.
//! - **Sampling**: for large datasets only the first, middle, and last
//!   `sample_size` rows are hashed. This bounds hashing cost on huge
//!   tables but two datasets that differ only inside an unsampled region
//!   alias to the same fingerprint, yielding a false cache hit. That is
//!   the documented trade-off of the mode, not a defect; callers who need
//!   exactness keep sampling off.

use crate::dataset::Dataset;
use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint assigned to datasets with zero rows.
///
/// Kept as a readable literal rather than a digest so empty-dataset cache
/// files are obvious in a directory listing.
pub const EMPTY_DATASET_FINGERPRINT: &str = "empty-dataset";

/// Deterministic identity of one dataset state.
///
/// Used purely as a lookup namespace; the string is a lowercase hex SHA-256
/// digest (or [`EMPTY_DATASET_FINGERPRINT`]), safe for use in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The fingerprint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes dataset fingerprints.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    sampling: bool,
    sample_size: usize,
}

impl Fingerprinter {
    /// Create a fingerprinter.
    ///
    /// # Arguments
    ///
    /// * `sampling` - hash row samples instead of full content for large datasets
    /// * `sample_size` - rows per sampled slice (ignored when `sampling` is off)
    pub fn new(sampling: bool, sample_size: usize) -> Self {
        Self {
            sampling,
            sample_size,
        }
    }

    /// Compute the fingerprint of a dataset.
    pub fn compute(&self, dataset: &dyn Dataset) -> Fingerprint {
        let rows = dataset.row_count();
        if rows == 0 {
            return Fingerprint(EMPTY_DATASET_FINGERPRINT.to_string());
        }

        let mut hasher = Sha256::new();
        let mut buf = Vec::new();
        dataset.write_schema(&mut buf);
        hasher.update(&buf);

        // A dataset is only "large" once sampling actually saves work;
        // below 3x the sample size the slices would cover everything anyway.
        if self.sampling && self.sample_size > 0 && rows > 3 * self.sample_size {
            let n = self.sample_size;
            let middle = (rows - n) / 2;
            for range in [0..n, middle..middle + n, rows - n..rows] {
                buf.clear();
                dataset.write_rows(range, &mut buf);
                hasher.update(&buf);
            }
        } else {
            buf.clear();
            dataset.write_rows(0..rows, &mut buf);
            hasher.update(&buf);
        }

        Fingerprint(hex::encode(hasher.finalize()))
    }
}
