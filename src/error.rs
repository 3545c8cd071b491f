//! Domain error taxonomy.
//!
//! Configuration problems (inverted ranges, duplicate names) are
//! user-correctable and carry the offending values; storage failures
//! bubble up from write paths only — read paths degrade to safe
//! defaults instead (see `vacation` and `scenario`). Nothing here is
//! retried.

use chrono::NaiveDate;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the roster engine's fallible operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    /// A date range with end before start.
    #[error("invalid date range: {end} is before {start}")]
    InvalidDateRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// A scenario (or other named entity) with this name already exists.
    #[error("name already in use: '{0}'")]
    DuplicateName(String),

    /// A write-path lookup by id found nothing.
    #[error("scenario not found: id {0}")]
    ScenarioNotFound(u64),

    /// The backing store failed on a write path.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
