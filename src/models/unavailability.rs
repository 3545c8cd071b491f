//! Unavailability (vacation/absence) records.
//!
//! One record per (resource, day); ranges are expanded by the store,
//! and a later entry for the same day overwrites the earlier one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a resource is unavailable on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailabilityReason {
    /// Planned vacation.
    Vacation,
    /// Sick leave.
    Sick,
    /// Training or course attendance.
    Training,
    /// Any other absence.
    Other,
}

impl UnavailabilityReason {
    /// Display label for conflict messages.
    pub fn label(&self) -> &'static str {
        match self {
            UnavailabilityReason::Vacation => "vacation",
            UnavailabilityReason::Sick => "sick leave",
            UnavailabilityReason::Training => "training",
            UnavailabilityReason::Other => "absence",
        }
    }
}

/// A single-day unavailability entry for one resource.
///
/// Unique per (resource, date); the store enforces upsert semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// Resource this record applies to.
    pub resource_name: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Reason code.
    pub reason: UnavailabilityReason,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl UnavailabilityRecord {
    /// Creates a record. The id is assigned by the store on insert.
    pub fn new(
        resource_name: impl Into<String>,
        date: NaiveDate,
        reason: UnavailabilityReason,
    ) -> Self {
        Self {
            id: 0,
            resource_name: resource_name.into(),
            date,
            reason,
            note: None,
        }
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
