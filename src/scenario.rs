//! Scenario snapshots and comparison.
//!
//! A scenario is a named, timestamped copy of an assignment set for
//! one target month, with cached fairness and conflict metrics. At
//! most one scenario per target month carries the baseline flag.
//! Metrics are recomputed whenever the stored assignments change —
//! the cache never outlives an edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::conflict::ConflictDetector;
use crate::error::RosterError;
use crate::fairness::FairnessReport;
use crate::models::{Assignment, Resource};
use crate::storage::{Entity, InMemoryRepository, Repository};

/// A saved roster variant with cached metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Manager-assigned identifier.
    pub id: u64,
    /// Unique scenario name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Target month's year.
    pub target_year: i32,
    /// Target month (1-12).
    pub target_month: u32,
    /// Full copy of the assignment set at snapshot time.
    pub assignments: Vec<Assignment>,
    /// Cached distribution score at the last recompute.
    pub fairness_score: f64,
    /// Cached population stddev at the last recompute.
    pub std_deviation: f64,
    /// Cached conflict total at the last recompute.
    pub conflict_count: usize,
    /// Whether this is the month's baseline. At most one per month.
    pub is_baseline: bool,
}

impl Entity for Scenario {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Per-resource assignment-count difference between two scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountDelta {
    /// Resource name.
    pub resource_name: String,
    /// Count in the first scenario (0 if absent).
    pub count_a: usize,
    /// Count in the second scenario (0 if absent).
    pub count_b: usize,
    /// Signed difference `count_b − count_a`. Never zero.
    pub delta: i64,
}

/// Result of diffing two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// First scenario's name.
    pub name_a: String,
    /// Second scenario's name.
    pub name_b: String,
    /// Per-resource deltas over the union of names touched by either
    /// side, omitting resources with identical counts. Sorted by name.
    pub deltas: Vec<CountDelta>,
    /// Fairness-score difference (b − a).
    pub fairness_delta: f64,
    /// Conflict-count difference (b − a).
    pub conflict_delta: i64,
}

/// Manages scenario lifecycle over a repository.
///
/// Reads are fail-open (None/empty with a warning); writes, including
/// the duplicate-name check that guards them, propagate storage errors.
pub struct ScenarioManager {
    repo: Box<dyn Repository<Scenario>>,
    next_id: u64,
}

impl ScenarioManager {
    /// Creates a manager over the in-memory repository.
    pub fn new() -> Self {
        Self::with_repository(Box::new(InMemoryRepository::new()))
    }

    /// Creates a manager over a caller-supplied repository.
    pub fn with_repository(repo: Box<dyn Repository<Scenario>>) -> Self {
        let next_id = match repo.find_all() {
            Ok(all) => all.iter().map(|s| s.id).max().map_or(1, |m| m + 1),
            Err(err) => {
                warn!(error = %err, "could not scan scenario store; starting ids at 1");
                1
            }
        };
        Self { repo, next_id }
    }

    /// Snapshots an assignment set as a new scenario.
    ///
    /// The name must be unused; metrics are computed at creation time.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        target_year: i32,
        target_month: u32,
        assignments: Vec<Assignment>,
        pool: &[Resource],
        detector: &ConflictDetector<'_>,
    ) -> Result<Scenario, RosterError> {
        let clashes = self.repo.query(&|s: &Scenario| s.name == name)?;
        if !clashes.is_empty() {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        let (fairness_score, std_deviation, conflict_count) =
            compute_metrics(&assignments, pool, detector);

        let scenario = Scenario {
            id: self.next_id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            target_year,
            target_month,
            assignments,
            fairness_score,
            std_deviation,
            conflict_count,
            is_baseline: false,
        };
        self.next_id += 1;
        self.repo.save(scenario.clone())?;
        Ok(scenario)
    }

    /// Looks up a scenario. Fail-open: `None` on storage failure.
    pub fn get(&self, id: u64) -> Option<Scenario> {
        match self.repo.find_by_key(&id) {
            Ok(found) => found,
            Err(err) => {
                warn!(id, error = %err, "scenario lookup failed; treating as absent");
                None
            }
        }
    }

    /// All scenarios, oldest first. Fail-open to empty.
    pub fn list(&self) -> Vec<Scenario> {
        match self.repo.find_all() {
            Ok(mut all) => {
                all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                all
            }
            Err(err) => {
                warn!(error = %err, "scenario scan failed; returning empty list");
                Vec::new()
            }
        }
    }

    /// Replaces a scenario's assignments and recomputes its metrics.
    pub fn update_assignments(
        &mut self,
        id: u64,
        assignments: Vec<Assignment>,
        pool: &[Resource],
        detector: &ConflictDetector<'_>,
    ) -> Result<Scenario, RosterError> {
        let mut scenario = self
            .repo
            .find_by_key(&id)?
            .ok_or(RosterError::ScenarioNotFound(id))?;

        let (fairness_score, std_deviation, conflict_count) =
            compute_metrics(&assignments, pool, detector);
        scenario.assignments = assignments;
        scenario.fairness_score = fairness_score;
        scenario.std_deviation = std_deviation;
        scenario.conflict_count = conflict_count;

        self.repo.save(scenario.clone())?;
        Ok(scenario)
    }

    /// Deletes a scenario. Returns whether it existed.
    pub fn delete(&mut self, id: u64) -> Result<bool, RosterError> {
        Ok(self.repo.delete(&id)?)
    }

    /// Marks one scenario as its month's baseline.
    ///
    /// Clears the flag on every other scenario of the same target
    /// month first, as one logical operation: the new flag is written
    /// last, so a storage failure can drop a baseline but never leave
    /// two set.
    pub fn set_baseline(&mut self, id: u64) -> Result<(), RosterError> {
        let mut chosen = self
            .repo
            .find_by_key(&id)?
            .ok_or(RosterError::ScenarioNotFound(id))?;

        let siblings = self.repo.query(&|s: &Scenario| {
            s.id != id
                && s.is_baseline
                && s.target_year == chosen.target_year
                && s.target_month == chosen.target_month
        })?;
        for mut sibling in siblings {
            sibling.is_baseline = false;
            self.repo.save(sibling)?;
        }

        chosen.is_baseline = true;
        self.repo.save(chosen)?;
        Ok(())
    }

    /// Diffs two scenarios by per-resource assignment counts.
    ///
    /// Both ids must exist; delta entries cover the union of resource
    /// names touched by either side, omitting identical counts.
    pub fn compare(&self, id_a: u64, id_b: u64) -> Result<ScenarioComparison, RosterError> {
        let a = self
            .repo
            .find_by_key(&id_a)?
            .ok_or(RosterError::ScenarioNotFound(id_a))?;
        let b = self
            .repo
            .find_by_key(&id_b)?
            .ok_or(RosterError::ScenarioNotFound(id_b))?;

        let counts_a = count_by_resource(&a.assignments);
        let counts_b = count_by_resource(&b.assignments);

        let mut names: Vec<&String> = counts_a.keys().chain(counts_b.keys()).collect();
        names.sort();
        names.dedup();

        let deltas = names
            .into_iter()
            .filter_map(|name| {
                let count_a = counts_a.get(name).copied().unwrap_or(0);
                let count_b = counts_b.get(name).copied().unwrap_or(0);
                if count_a == count_b {
                    return None;
                }
                Some(CountDelta {
                    resource_name: name.clone(),
                    count_a,
                    count_b,
                    delta: count_b as i64 - count_a as i64,
                })
            })
            .collect();

        Ok(ScenarioComparison {
            name_a: a.name,
            name_b: b.name,
            deltas,
            fairness_delta: b.fairness_score - a.fairness_score,
            conflict_delta: b.conflict_count as i64 - a.conflict_count as i64,
        })
    }
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_metrics(
    assignments: &[Assignment],
    pool: &[Resource],
    detector: &ConflictDetector<'_>,
) -> (f64, f64, usize) {
    let fairness = FairnessReport::summarize(assignments, pool);
    let conflicts = detector.detect(assignments, pool);
    (fairness.score, fairness.std_deviation, conflicts.total())
}

fn count_by_resource(assignments: &[Assignment]) -> std::collections::HashMap<String, usize> {
    let mut counts = std::collections::HashMap::new();
    for a in assignments {
        *counts.entry(a.resource_name.clone()).or_insert(0) += 1;
    }
    counts
}
