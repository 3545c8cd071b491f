//! Assignment model and duty time profiles.
//!
//! An assignment binds one resource to one (date, group, duty type)
//! slot. Start/end times are derived from the active time profile —
//! they travel with the record for export convenience but are not
//! independently authoritative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Duty classification for a roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyType {
    /// Overnight on-call duty ("Bereitschaft").
    OnCall,
    /// Regular day shift.
    DayShift,
}

impl DutyType {
    /// Default start/end times of day (`HH:mm`) for this duty type.
    pub fn default_times(&self) -> (&'static str, &'static str) {
        match self {
            DutyType::OnCall => ("17:00", "08:00"),
            DutyType::DayShift => ("08:00", "17:00"),
        }
    }
}

/// Configurable start/end times per duty type.
///
/// Defaults to [`DutyType::default_times`]; either bound can be
/// overridden (e.g., on-call starting at 16:00 in winter districts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeProfile {
    /// On-call duty bounds (`HH:mm`).
    pub on_call: (String, String),
    /// Day-shift bounds (`HH:mm`).
    pub day_shift: (String, String),
}

impl Default for TimeProfile {
    fn default() -> Self {
        let (ocs, oce) = DutyType::OnCall.default_times();
        let (dss, dse) = DutyType::DayShift.default_times();
        Self {
            on_call: (ocs.into(), oce.into()),
            day_shift: (dss.into(), dse.into()),
        }
    }
}

impl TimeProfile {
    /// Overrides the on-call bounds.
    pub fn with_on_call(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.on_call = (start.into(), end.into());
        self
    }

    /// Overrides the day-shift bounds.
    pub fn with_day_shift(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.day_shift = (start.into(), end.into());
        self
    }

    /// Start/end times for a duty type under this profile.
    pub fn times_for(&self, duty_type: DutyType) -> (&str, &str) {
        match duty_type {
            DutyType::OnCall => (&self.on_call.0, &self.on_call.1),
            DutyType::DayShift => (&self.day_shift.0, &self.day_shift.1),
        }
    }
}

/// Identifying key of a roster slot: exactly one assignment is expected
/// per (date, group, duty type); more than one is a double-booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Calendar day of the slot.
    pub date: NaiveDate,
    /// Group name.
    pub group_name: String,
    /// Duty classification.
    pub duty_type: DutyType,
}

/// A duty assignment: one resource covering one slot.
///
/// Flat, serializable record with no back-references — the shape
/// consumed by the Excel/ICS export adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Calendar day (no time-of-day ambiguity at this granularity).
    pub date: NaiveDate,
    /// Assigned group name.
    pub group_name: String,
    /// Assigned resource name.
    pub resource_name: String,
    /// Duty classification.
    pub duty_type: DutyType,
    /// Start time of day (`HH:mm`), derived from the time profile.
    pub start_time: String,
    /// End time of day (`HH:mm`), derived from the time profile.
    pub end_time: String,
    /// Derived flag, recomputed by conflict detection. Never user-set.
    pub has_conflict: bool,
}

impl Assignment {
    /// Creates a new assignment with times from the default profile.
    pub fn new(
        date: NaiveDate,
        group_name: impl Into<String>,
        resource_name: impl Into<String>,
        duty_type: DutyType,
    ) -> Self {
        let (start, end) = duty_type.default_times();
        Self {
            date,
            group_name: group_name.into(),
            resource_name: resource_name.into(),
            duty_type,
            start_time: start.into(),
            end_time: end.into(),
            has_conflict: false,
        }
    }

    /// Applies start/end times from a time profile.
    pub fn with_profile(mut self, profile: &TimeProfile) -> Self {
        let (start, end) = profile.times_for(self.duty_type);
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    /// The identifying (date, group, duty type) slot key.
    pub fn slot(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            group_name: self.group_name.clone(),
            duty_type: self.duty_type,
        }
    }
}
