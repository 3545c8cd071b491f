//! Vacation/unavailability store.
//!
//! Date-indexed absence records per resource, kept behind the generic
//! repository trait. Ranges expand to one record per day with upsert
//! semantics on (resource, date).
//!
//! # Failure policy
//!
//! Read paths are fail-open: a storage failure is logged and answered
//! with "no known unavailability" (empty list / available). Callers
//! must treat an empty result as absence of information, not proof of
//! availability. Write paths propagate storage errors — silently
//! dropping a vacation entry would corrupt user expectations.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::warn;

use crate::error::RosterError;
use crate::models::{UnavailabilityReason, UnavailabilityRecord};
use crate::storage::{Entity, InMemoryRepository, Repository};

impl Entity for UnavailabilityRecord {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Per-resource day availability index: resource name → sorted dates.
///
/// Built once per scheduling pass for cheap membership checks.
pub type AvailabilityIndex = HashMap<String, BTreeSet<NaiveDate>>;

/// Store of per-person unavailability days.
pub struct VacationStore {
    repo: Box<dyn Repository<UnavailabilityRecord>>,
    next_id: u64,
}

impl VacationStore {
    /// Creates a store over the in-memory repository.
    pub fn new() -> Self {
        Self::with_repository(Box::new(InMemoryRepository::new()))
    }

    /// Creates a store over a caller-supplied repository.
    pub fn with_repository(repo: Box<dyn Repository<UnavailabilityRecord>>) -> Self {
        let next_id = match repo.find_all() {
            Ok(all) => all.iter().map(|r| r.id).max().map_or(1, |m| m + 1),
            Err(err) => {
                warn!(error = %err, "could not scan unavailability store; starting ids at 1");
                1
            }
        };
        Self { repo, next_id }
    }

    /// Records an absence for every day in `[start, end]` inclusive.
    ///
    /// Each day is an independent upsert: an existing record for that
    /// (resource, day) is overwritten, keeping its id. Returns the
    /// records as stored.
    pub fn add_range(
        &mut self,
        resource_name: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: UnavailabilityReason,
        note: Option<&str>,
    ) -> Result<Vec<UnavailabilityRecord>, RosterError> {
        if end < start {
            return Err(RosterError::InvalidDateRange { start, end });
        }

        let mut stored = Vec::new();
        let mut date = start;
        while date <= end {
            let id = match self.find_for_day(resource_name, date)? {
                Some(existing) => existing.id,
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    id
                }
            };
            let mut record = UnavailabilityRecord::new(resource_name, date, reason);
            record.id = id;
            record.note = note.map(String::from);
            self.repo.save(record.clone())?;
            stored.push(record);
            date = date.succ_opt().unwrap_or(date);
        }
        Ok(stored)
    }

    /// Whether a resource has no recorded absence on a date.
    ///
    /// Fail-open: a storage failure is logged and answered with `true`.
    pub fn is_available(&self, resource_name: &str, date: NaiveDate) -> bool {
        match self.find_for_day(resource_name, date) {
            Ok(found) => found.is_none(),
            Err(err) => {
                warn!(
                    resource = resource_name,
                    %date,
                    error = %err,
                    "availability check failed; assuming available"
                );
                true
            }
        }
    }

    /// The record for a (resource, date), if any. Fail-open to `None`.
    pub fn get_for_day(
        &self,
        resource_name: &str,
        date: NaiveDate,
    ) -> Option<UnavailabilityRecord> {
        match self.find_for_day(resource_name, date) {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    resource = resource_name,
                    %date,
                    error = %err,
                    "unavailability lookup failed; treating as absent"
                );
                None
            }
        }
    }

    /// All records with `start <= date <= end`, ordered by date then
    /// resource name. Fail-open to empty.
    pub fn get_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<UnavailabilityRecord> {
        let mut records = self.query_open(&|r: &UnavailabilityRecord| {
            r.date >= start && r.date <= end
        });
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.resource_name.cmp(&b.resource_name))
        });
        records
    }

    /// All records for one resource, ordered by date. Fail-open to empty.
    pub fn get_for_resource(&self, resource_name: &str) -> Vec<UnavailabilityRecord> {
        let mut records =
            self.query_open(&|r: &UnavailabilityRecord| r.resource_name == resource_name);
        records.sort_by_key(|r| r.date);
        records
    }

    /// Builds the resource → sorted-dates index, optionally bounded.
    ///
    /// Fail-open: on storage failure the index is empty, i.e. everyone
    /// reads as available.
    pub fn availability_index(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AvailabilityIndex {
        let records = self.query_open(&|r: &UnavailabilityRecord| {
            start.is_none_or(|s| r.date >= s) && end.is_none_or(|e| r.date <= e)
        });
        let mut index = AvailabilityIndex::new();
        for record in records {
            index
                .entry(record.resource_name)
                .or_default()
                .insert(record.date);
        }
        index
    }

    /// Deletes one record by id. Returns whether it existed.
    pub fn remove(&mut self, id: u64) -> Result<bool, RosterError> {
        Ok(self.repo.delete(&id)?)
    }

    /// Deletes all records for a (resource, date). Returns the count.
    pub fn remove_for_day(
        &mut self,
        resource_name: &str,
        date: NaiveDate,
    ) -> Result<usize, RosterError> {
        let matching = self.repo.query(&|r: &UnavailabilityRecord| {
            r.resource_name == resource_name && r.date == date
        })?;
        let mut removed = 0;
        for record in &matching {
            if self.repo.delete(&record.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Deletes every record.
    pub fn remove_all(&mut self) -> Result<usize, RosterError> {
        let all = self.repo.find_all()?;
        let mut removed = 0;
        for record in &all {
            if self.repo.delete(&record.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Deletes every record for one resource. Returns the count.
    pub fn remove_for_resource(&mut self, resource_name: &str) -> Result<usize, RosterError> {
        let matching = self
            .repo
            .query(&|r: &UnavailabilityRecord| r.resource_name == resource_name)?;
        let mut removed = 0;
        for record in &matching {
            if self.repo.delete(&record.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn find_for_day(
        &self,
        resource_name: &str,
        date: NaiveDate,
    ) -> Result<Option<UnavailabilityRecord>, RosterError> {
        let matching = self.repo.query(&|r: &UnavailabilityRecord| {
            r.resource_name == resource_name && r.date == date
        })?;
        Ok(matching.into_iter().next())
    }

    fn query_open(
        &self,
        predicate: &dyn Fn(&UnavailabilityRecord) -> bool,
    ) -> Vec<UnavailabilityRecord> {
        match self.repo.query(predicate) {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "unavailability query failed; returning empty result");
                Vec::new()
            }
        }
    }
}

impl Default for VacationStore {
    fn default() -> Self {
        Self::new()
    }
}
