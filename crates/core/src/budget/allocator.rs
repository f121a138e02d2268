//! Sequential display-ID allocation.
//!
//! Each (series, year) partition owns one counter. The store increments it
//! atomically, so concurrent allocations in one partition never observe the
//! same value. The greatest identifier already present in the partition seeds
//! the counter, which keeps numbering continuous for data created before the
//! counter existed.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use super::display_id::{MAX_RUNNING_NUMBER, SequenceKind, parse_running_number, year_prefix};

/// Errors from display-ID allocation.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// The partition has used every four-digit running number.
    #[error("display id capacity exceeded for partition {partition}")]
    CapacityExceeded {
        /// Exhausted partition prefix, e.g. `OP-25`.
        partition: String,
    },

    /// The backing store failed or is unreachable.
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Persistence required by the allocator.
///
/// This trait is implemented by the db crate against the counter table.
pub trait SequenceStore: Send + Sync {
    /// Lexicographically greatest display ID starting with `partition_prefix`.
    ///
    /// Stores should skip identifiers whose last four characters are not
    /// digits; the allocator seeds from zero when handed one anyway.
    fn latest_display_id(
        &self,
        kind: SequenceKind,
        partition_prefix: &str,
    ) -> impl Future<Output = Result<Option<String>, SequenceError>> + Send;

    /// Atomically sets the partition counter to `max(counter, seed) + 1` and
    /// returns the new value. A missing counter starts from `seed`.
    fn increment(
        &self,
        kind: SequenceKind,
        year_prefix: &str,
        seed: u32,
    ) -> impl Future<Output = Result<u32, SequenceError>> + Send;
}

/// Allocates display IDs through a [`SequenceStore`].
#[derive(Debug, Clone)]
pub struct SequenceAllocator<S> {
    store: S,
}

impl<S: SequenceStore> SequenceAllocator<S> {
    /// Creates an allocator over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Allocates the next display ID of `kind` for the year of `reference_time`.
    ///
    /// No retry happens here; persistence failures are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::CapacityExceeded` once the running number would
    /// pass 9999, and `SequenceError::Persistence` when the store fails.
    pub async fn allocate(
        &self,
        kind: SequenceKind,
        reference_time: DateTime<Utc>,
    ) -> Result<String, SequenceError> {
        let yy = year_prefix(reference_time);
        let partition = kind.partition_prefix(&yy);

        let seed = match self.store.latest_display_id(kind, &partition).await? {
            None => 0,
            Some(latest) => parse_running_number(&latest).unwrap_or_else(|| {
                warn!(
                    display_id = %latest,
                    partition = %partition,
                    "Malformed display id in partition, seeding running number from zero"
                );
                0
            }),
        };

        let next = self.store.increment(kind, &yy, seed).await?;
        if next > MAX_RUNNING_NUMBER {
            return Err(SequenceError::CapacityExceeded { partition });
        }

        Ok(kind.format(&yy, next))
    }
}
