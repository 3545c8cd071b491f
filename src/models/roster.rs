//! Roster (assignment set) container.
//!
//! Owns the working set of assignments for a planning period and
//! provides the slot-level edit operations the host UI drives:
//! upsert-by-slot (re-assigning a slot replaces the previous holder),
//! removal, and the query surface the analysis passes read from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Assignment, Resource, SlotKey};
use chrono::NaiveDate;

/// A mutable set of duty assignments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Assignments in insertion order.
    pub assignments: Vec<Assignment>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from an existing assignment list.
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Inserts an assignment, replacing any existing one for the same
    /// (date, group, duty type) slot.
    ///
    /// Returns the replaced assignment, if any. Re-assigning a slot to
    /// a different resource is a mutation of the slot, not a second
    /// booking.
    pub fn upsert(&mut self, assignment: Assignment) -> Option<Assignment> {
        let slot = assignment.slot();
        if let Some(existing) = self.assignments.iter_mut().find(|a| a.slot() == slot) {
            Some(std::mem::replace(existing, assignment))
        } else {
            self.assignments.push(assignment);
            None
        }
    }

    /// Appends without slot deduplication.
    ///
    /// Used when loading externally produced data that may legitimately
    /// contain double-bookings for the detector to find.
    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Removes the assignment for a slot. Returns it if present.
    pub fn remove(&mut self, slot: &SlotKey) -> Option<Assignment> {
        let idx = self.assignments.iter().position(|a| &a.slot() == slot)?;
        Some(self.assignments.remove(idx))
    }

    /// Removes all assignments.
    pub fn clear(&mut self) {
        self.assignments.clear();
    }

    /// Returns all assignments for a given resource.
    pub fn assignments_for_resource(&self, resource_name: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.resource_name == resource_name)
            .collect()
    }

    /// Returns all assignments on a given date.
    pub fn assignments_on(&self, date: NaiveDate) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Per-resource assignment counts over a pool.
    ///
    /// Pool members without assignments are included at 0; assignments
    /// to names outside the pool are counted under their own name.
    pub fn counts_by_resource(&self, pool: &[Resource]) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> =
            pool.iter().map(|r| (r.name.clone(), 0)).collect();
        for a in &self.assignments {
            *counts.entry(a.resource_name.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
