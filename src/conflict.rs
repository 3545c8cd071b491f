//! Conflict detection over a finalized assignment set.
//!
//! Four independent passes over the same list: double bookings,
//! consecutive-day overload runs, vacation collisions, and workload
//! imbalance. Categories are not mutually exclusive — one assignment
//! may surface in several of them, and the total is the raw sum.
//! Records are derived and ephemeral: every run recomputes them from
//! scratch, so re-running detection on an unchanged list yields an
//! identical report.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Resource};
use crate::vacation::VacationStore;

/// Longest permitted run of consecutive duty days.
pub const MAX_CONSECUTIVE_DAYS: usize = 3;

/// Conflict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictType {
    /// One resource booked twice on the same day.
    DoubleAssignment,
    /// More than [`MAX_CONSECUTIVE_DAYS`] consecutive duty days.
    Overload,
    /// Duty assigned on a recorded absence day.
    VacationConflict,
    /// Assignment count far from the pool average.
    WorkloadImbalance,
}

/// Conflict severity, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational; no compliance impact.
    Low,
    /// Should be fixed before publishing the roster.
    Medium,
    /// Must be fixed; the roster is not workable as-is.
    High,
}

/// A single detected conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Conflict classification.
    pub conflict_type: ConflictType,
    /// Reference date: the booked day, the run start, or the
    /// resource's latest duty day for imbalance findings.
    pub date: NaiveDate,
    /// Affected resource.
    pub resource_name: String,
    /// Severity tier.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// A proposed remedy for a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSuggestion {
    /// Substitute this resource into the conflicting slot.
    Reassign {
        /// Candidate resource name.
        resource_name: String,
    },
    /// No automatic substitution; a hint for manual remediation.
    Manual {
        /// What to do by hand.
        hint: String,
    },
}

/// Aggregated result of one detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Same resource booked more than once on one day.
    pub double_assignments: Vec<ConflictRecord>,
    /// Consecutive-day runs over the limit.
    pub overloads: Vec<ConflictRecord>,
    /// Assignments colliding with recorded absences.
    pub vacation_conflicts: Vec<ConflictRecord>,
    /// Over-/underloaded resources.
    pub imbalances: Vec<ConflictRecord>,
}

impl ConflictReport {
    /// Raw sum of all four category counts.
    ///
    /// An assignment appearing in several categories counts once per
    /// category.
    pub fn total(&self) -> usize {
        self.double_assignments.len()
            + self.overloads.len()
            + self.vacation_conflicts.len()
            + self.imbalances.len()
    }

    /// Whether no conflicts were found.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// All records in display order: severity descending, date ascending.
    pub fn all_conflicts(&self) -> Vec<&ConflictRecord> {
        let mut all: Vec<&ConflictRecord> = self
            .double_assignments
            .iter()
            .chain(&self.overloads)
            .chain(&self.vacation_conflicts)
            .chain(&self.imbalances)
            .collect();
        all.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.date.cmp(&b.date))
        });
        all
    }
}

/// Post-hoc analyzer over an assignment set.
///
/// Borrows the vacation store for the collision pass; holds no other
/// state, so detection is deterministic for a given input.
pub struct ConflictDetector<'a> {
    vacations: &'a VacationStore,
}

impl<'a> ConflictDetector<'a> {
    /// Creates a detector over a vacation store.
    pub fn new(vacations: &'a VacationStore) -> Self {
        Self { vacations }
    }

    /// Runs all four passes over `assignments`.
    pub fn detect(&self, assignments: &[Assignment], pool: &[Resource]) -> ConflictReport {
        ConflictReport {
            double_assignments: self.detect_double_assignments(assignments),
            overloads: self.detect_overloads(assignments),
            vacation_conflicts: self.detect_vacation_conflicts(assignments),
            imbalances: self.detect_imbalances(assignments, pool),
        }
    }

    /// One record per (date, resource) booked more than once.
    fn detect_double_assignments(&self, assignments: &[Assignment]) -> Vec<ConflictRecord> {
        let mut by_slot: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();
        for a in assignments {
            *by_slot.entry((a.date, a.resource_name.as_str())).or_insert(0) += 1;
        }

        by_slot
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|((date, name), count)| ConflictRecord {
                conflict_type: ConflictType::DoubleAssignment,
                date,
                resource_name: name.to_string(),
                severity: Severity::High,
                message: format!("{name} is booked {count} times on {date}"),
            })
            .collect()
    }

    /// One record per run of more than [`MAX_CONSECUTIVE_DAYS`] days.
    ///
    /// Duplicate dates (double bookings) count once toward a run; the
    /// duplication itself is the double-assignment pass's finding.
    fn detect_overloads(&self, assignments: &[Assignment]) -> Vec<ConflictRecord> {
        let mut dates_by_resource: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
        for a in assignments {
            dates_by_resource
                .entry(a.resource_name.as_str())
                .or_default()
                .insert(a.date);
        }

        let mut records = Vec::new();
        for (name, dates) in dates_by_resource {
            let mut run_start: Option<NaiveDate> = None;
            let mut run_len = 0usize;
            let mut prev: Option<NaiveDate> = None;

            for &date in &dates {
                let consecutive = prev.and_then(|p| p.succ_opt()) == Some(date);
                if consecutive {
                    run_len += 1;
                } else {
                    // Any gap resets the run
                    Self::flush_run(&mut records, name, run_start, run_len);
                    run_start = Some(date);
                    run_len = 1;
                }
                prev = Some(date);
            }
            Self::flush_run(&mut records, name, run_start, run_len);
        }
        records
    }

    fn flush_run(
        records: &mut Vec<ConflictRecord>,
        name: &str,
        run_start: Option<NaiveDate>,
        run_len: usize,
    ) {
        let Some(start) = run_start else { return };
        if run_len > MAX_CONSECUTIVE_DAYS {
            records.push(ConflictRecord {
                conflict_type: ConflictType::Overload,
                date: start,
                resource_name: name.to_string(),
                severity: Severity::Medium,
                message: format!(
                    "{name} is on duty {run_len} consecutive days starting {start} \
                     (limit {MAX_CONSECUTIVE_DAYS})"
                ),
            });
        }
    }

    /// One record per assignment on a recorded absence day.
    fn detect_vacation_conflicts(&self, assignments: &[Assignment]) -> Vec<ConflictRecord> {
        let mut records: Vec<ConflictRecord> = assignments
            .iter()
            .filter_map(|a| {
                let absence = self.vacations.get_for_day(&a.resource_name, a.date)?;
                Some(ConflictRecord {
                    conflict_type: ConflictType::VacationConflict,
                    date: a.date,
                    resource_name: a.resource_name.clone(),
                    severity: Severity::High,
                    message: format!(
                        "{} is on duty on {} despite recorded {}",
                        a.resource_name,
                        a.date,
                        absence.reason.label()
                    ),
                })
            })
            .collect();
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.resource_name.cmp(&b.resource_name))
        });
        records
    }

    /// Flags counts outside `average ± average/2`.
    ///
    /// Resources with exactly zero assignments are not flagged as
    /// underloaded: zero means "not yet scheduled", not an imbalance.
    fn detect_imbalances(
        &self,
        assignments: &[Assignment],
        pool: &[Resource],
    ) -> Vec<ConflictRecord> {
        if pool.is_empty() || assignments.is_empty() {
            return Vec::new();
        }

        let average = assignments.len() as f64 / pool.len() as f64;
        let threshold = average * 0.5;

        let mut counts: BTreeMap<&str, usize> =
            pool.iter().map(|r| (r.name.as_str(), 0)).collect();
        let mut last_date: BTreeMap<&str, NaiveDate> = BTreeMap::new();
        for a in assignments {
            if let Some(count) = counts.get_mut(a.resource_name.as_str()) {
                *count += 1;
                let entry = last_date.entry(a.resource_name.as_str()).or_insert(a.date);
                if a.date > *entry {
                    *entry = a.date;
                }
            }
        }

        let mut records = Vec::new();
        for (name, count) in counts {
            let date = last_date.get(name).copied();
            if count as f64 > average + threshold {
                records.push(ConflictRecord {
                    conflict_type: ConflictType::WorkloadImbalance,
                    date: date.unwrap_or_default(),
                    resource_name: name.to_string(),
                    severity: Severity::Medium,
                    message: format!(
                        "{name} carries {count} duties against a pool average of {average:.1}"
                    ),
                });
            } else if count > 0 && (count as f64) < average - threshold {
                records.push(ConflictRecord {
                    conflict_type: ConflictType::WorkloadImbalance,
                    date: date.unwrap_or_default(),
                    resource_name: name.to_string(),
                    severity: Severity::Low,
                    message: format!(
                        "{name} carries only {count} duties against a pool average of {average:.1}"
                    ),
                });
            }
        }
        records
    }

    /// Proposes remedies for one conflict.
    ///
    /// - Vacation collision: up to 3 substitutes who are unassigned
    ///   that day and have no recorded absence.
    /// - Overload / imbalance: a manual-remediation hint.
    /// - Double assignment: nothing — which duplicate to keep is the
    ///   planner's call.
    pub fn suggest_fix(
        &self,
        conflict: &ConflictRecord,
        pool: &[Resource],
        assignments: &[Assignment],
    ) -> Vec<FixSuggestion> {
        match conflict.conflict_type {
            ConflictType::VacationConflict => {
                let assigned_that_day: BTreeSet<&str> = assignments
                    .iter()
                    .filter(|a| a.date == conflict.date)
                    .map(|a| a.resource_name.as_str())
                    .collect();

                pool.iter()
                    .filter(|r| r.name != conflict.resource_name)
                    .filter(|r| !assigned_that_day.contains(r.name.as_str()))
                    .filter(|r| self.vacations.is_available(&r.name, conflict.date))
                    .take(3)
                    .map(|r| FixSuggestion::Reassign {
                        resource_name: r.name.clone(),
                    })
                    .collect()
            }
            ConflictType::Overload => vec![FixSuggestion::Manual {
                hint: format!(
                    "Break up the run starting {} by swapping one of {}'s days to a colleague",
                    conflict.date, conflict.resource_name
                ),
            }],
            ConflictType::WorkloadImbalance => vec![FixSuggestion::Manual {
                hint: format!(
                    "Rebalance duties for {} across the pool before publishing",
                    conflict.resource_name
                ),
            }],
            ConflictType::DoubleAssignment => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DutyType, UnavailabilityReason};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn assign(d: u32, group: &str, resource: &str) -> Assignment {
        Assignment::new(day(d), group, resource, DutyType::OnCall)
    }

    fn pool(names: &[&str]) -> Vec<Resource> {
        names.iter().copied().map(Resource::new).collect()
    }

    #[test]
    fn test_double_assignment_same_day_two_groups() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        let assignments = vec![
            assign(5, "G1", "Mueller"),
            assign(5, "G2", "Mueller"),
            assign(6, "G1", "Weber"),
        ];

        let report = detector.detect(&assignments, &pool(&["Mueller", "Weber"]));
        assert_eq!(report.double_assignments.len(), 1);
        let record = &report.double_assignments[0];
        assert_eq!(record.resource_name, "Mueller");
        assert_eq!(record.date, day(5));
        assert_eq!(record.severity, Severity::High);
    }

    #[test]
    fn test_overload_threshold_edges() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        let names = pool(&["A"]);

        // Exactly 3 consecutive days: no overload
        let three: Vec<Assignment> = (1..=3).map(|d| assign(d, "G1", "A")).collect();
        assert!(detector.detect(&three, &names).overloads.is_empty());

        // 4 consecutive days: exactly one record, run start in message
        let four: Vec<Assignment> = (1..=4).map(|d| assign(d, "G1", "A")).collect();
        let report = detector.detect(&four, &names);
        assert_eq!(report.overloads.len(), 1);
        assert_eq!(report.overloads[0].date, day(1));
        assert!(report.overloads[0].message.contains("2026-01-01"));
        assert_eq!(report.overloads[0].severity, Severity::Medium);
    }

    #[test]
    fn test_overload_run_resets_on_gap() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        // Days 1,2,3, gap, 5,6,7,8: only the second run qualifies
        let assignments: Vec<Assignment> = [1, 2, 3, 5, 6, 7, 8]
            .iter()
            .map(|&d| assign(d, "G1", "A"))
            .collect();

        let report = detector.detect(&assignments, &pool(&["A"]));
        assert_eq!(report.overloads.len(), 1);
        assert_eq!(report.overloads[0].date, day(5));
    }

    #[test]
    fn test_overload_ignores_duplicate_dates() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        // Day 2 double-booked; the unique dates span only 3 days
        let assignments = vec![
            assign(1, "G1", "A"),
            assign(2, "G1", "A"),
            assign(2, "G2", "A"),
            assign(3, "G1", "A"),
        ];

        let report = detector.detect(&assignments, &pool(&["A"]));
        assert!(report.overloads.is_empty());
        assert_eq!(report.double_assignments.len(), 1);
    }

    #[test]
    fn test_vacation_conflict_includes_reason() {
        let mut store = VacationStore::new();
        store
            .add_range("Mueller", day(5), day(5), UnavailabilityReason::Sick, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);

        let assignments = vec![assign(5, "G1", "Mueller"), assign(6, "G1", "Mueller")];
        let report = detector.detect(&assignments, &pool(&["Mueller"]));
        assert_eq!(report.vacation_conflicts.len(), 1);
        let record = &report.vacation_conflicts[0];
        assert_eq!(record.severity, Severity::High);
        assert!(record.message.contains("sick leave"));
    }

    #[test]
    fn test_imbalance_bands_and_zero_exemption() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        // 12 assignments over 4 pool members: average 3, band 1.5..4.5.
        // Busy: 9 (overloaded), Light: 1 (underloaded),
        // Mid: 2 (within band), Idle: 0 (exempt).
        let mut assignments: Vec<Assignment> = (1..=9).map(|d| assign(d, "G1", "Busy")).collect();
        assignments.push(assign(10, "G1", "Light"));
        assignments.push(assign(11, "G1", "Mid"));
        assignments.push(assign(12, "G1", "Mid"));

        let names = pool(&["Busy", "Light", "Mid", "Idle"]);
        let report = detector.detect(&assignments, &names);
        let flagged: Vec<&str> = report
            .imbalances
            .iter()
            .map(|r| r.resource_name.as_str())
            .collect();
        assert_eq!(flagged, vec!["Busy", "Light"]);

        let busy = &report.imbalances[0];
        assert_eq!(busy.severity, Severity::Medium);
        let light = &report.imbalances[1];
        assert_eq!(light.severity, Severity::Low);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut store = VacationStore::new();
        store
            .add_range("A", day(2), day(2), UnavailabilityReason::Vacation, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);
        let assignments: Vec<Assignment> = (1..=6).map(|d| assign(d, "G1", "A")).collect();
        let names = pool(&["A", "B"]);

        let first = detector.detect(&assignments, &names);
        let second = detector.detect(&assignments, &names);
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_counts_overlapping_categories() {
        let mut store = VacationStore::new();
        store
            .add_range("A", day(1), day(1), UnavailabilityReason::Vacation, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);
        // Day 1 is both a vacation collision and part of an overload run
        let assignments: Vec<Assignment> = (1..=5).map(|d| assign(d, "G1", "A")).collect();

        let report = detector.detect(&assignments, &pool(&["A"]));
        assert_eq!(report.vacation_conflicts.len(), 1);
        assert_eq!(report.overloads.len(), 1);
        assert_eq!(
            report.total(),
            report.vacation_conflicts.len() + report.overloads.len() + report.imbalances.len()
        );
    }

    #[test]
    fn test_all_conflicts_ordering() {
        let mut store = VacationStore::new();
        store
            .add_range("A", day(9), day(9), UnavailabilityReason::Vacation, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);
        let mut assignments: Vec<Assignment> = (1..=5).map(|d| assign(d, "G1", "A")).collect();
        assignments.push(assign(9, "G1", "A"));

        let report = detector.detect(&assignments, &pool(&["A"]));
        let all = report.all_conflicts();
        assert!(all.len() >= 2);
        // Severity descending, then date ascending
        for pair in all.windows(2) {
            assert!(
                pair[0].severity > pair[1].severity
                    || (pair[0].severity == pair[1].severity && pair[0].date <= pair[1].date)
            );
        }
        assert_eq!(all[0].severity, Severity::High);
    }

    #[test]
    fn test_clean_roster() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        let assignments = vec![assign(1, "G1", "A"), assign(2, "G1", "B")];
        let report = detector.detect(&assignments, &pool(&["A", "B"]));
        assert!(report.is_clean());
        assert!(report.all_conflicts().is_empty());
    }

    #[test]
    fn test_suggest_fix_vacation_conflict() {
        let mut store = VacationStore::new();
        store
            .add_range("A", day(5), day(5), UnavailabilityReason::Vacation, None)
            .unwrap();
        // C is also away that day; D is assigned elsewhere that day
        store
            .add_range("C", day(5), day(5), UnavailabilityReason::Sick, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);

        let assignments = vec![assign(5, "G1", "A"), assign(5, "G2", "D")];
        let names = pool(&["A", "B", "C", "D", "E"]);
        let report = detector.detect(&assignments, &names);
        let conflict = &report.vacation_conflicts[0];

        let fixes = detector.suggest_fix(conflict, &names, &assignments);
        let candidates: Vec<&str> = fixes
            .iter()
            .filter_map(|f| match f {
                FixSuggestion::Reassign { resource_name } => Some(resource_name.as_str()),
                FixSuggestion::Manual { .. } => None,
            })
            .collect();
        // B and E are free and available; A (self), C (away), D (busy) are not
        assert_eq!(candidates, vec!["B", "E"]);
    }

    #[test]
    fn test_suggest_fix_caps_at_three() {
        let mut store = VacationStore::new();
        store
            .add_range("A", day(5), day(5), UnavailabilityReason::Vacation, None)
            .unwrap();
        let detector = ConflictDetector::new(&store);
        let assignments = vec![assign(5, "G1", "A")];
        let names = pool(&["A", "B", "C", "D", "E", "F"]);
        let report = detector.detect(&assignments, &names);

        let fixes = detector.suggest_fix(&report.vacation_conflicts[0], &names, &assignments);
        assert_eq!(fixes.len(), 3);
    }

    #[test]
    fn test_suggest_fix_other_categories() {
        let store = VacationStore::new();
        let detector = ConflictDetector::new(&store);
        let assignments: Vec<Assignment> = (1..=5).map(|d| assign(d, "G1", "A")).collect();
        let names = pool(&["A"]);
        let report = detector.detect(&assignments, &names);

        let overload_fixes = detector.suggest_fix(&report.overloads[0], &names, &assignments);
        assert!(matches!(overload_fixes[0], FixSuggestion::Manual { .. }));

        let double = ConflictRecord {
            conflict_type: ConflictType::DoubleAssignment,
            date: day(1),
            resource_name: "A".into(),
            severity: Severity::High,
            message: String::new(),
        };
        assert!(detector.suggest_fix(&double, &names, &assignments).is_empty());
    }
}
