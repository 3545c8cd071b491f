//! Greedy fairness-weighted auto-fill.
//!
//! # Algorithm
//!
//! 1. Target per person: `ceil(days / pool size)` — the flat-spread goal.
//! 2. Per group: shuffle a copy of the pool once (tie-break order),
//!    then walk the range day by day.
//! 3. Candidates per day: the pool minus people unavailable that day,
//!    minus people who worked the previous day. The consecutive-day
//!    filter is relaxed when it alone would empty the set; if the
//!    availability filter empties it too, the full pool is used. Both
//!    rules are soft — someone is always assigned.
//! 4. Score: `(target − count)·100 + days_since_last·10`, plus 5 on
//!    weekends for candidates under target. Highest wins; equal scores
//!    resolve to the earlier shuffled position, so runs are only
//!    reproducible under a fixed seed.
//!
//! # Complexity
//! O(g · d · r) for g groups, d days, r pool size.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{Assignment, DutyType, Group, Resource, TimeProfile};
use crate::vacation::AvailabilityIndex;

/// Greedy day-by-day roster scheduler.
///
/// Holds only its random source; every fill call is a fresh
/// computation over the inputs with no state carried between calls.
///
/// # Example
///
/// ```
/// use duty_roster::models::{DutyType, Group, Resource, TimeProfile};
/// use duty_roster::scheduler::AutoFillScheduler;
///
/// let groups = vec![Group::new("Team A")];
/// let pool: Vec<Resource> = ["Mueller", "Weber", "Fischer"]
///     .into_iter()
///     .map(Resource::new)
///     .collect();
///
/// let mut scheduler = AutoFillScheduler::with_seed(42);
/// let roster = scheduler.fill_month(
///     2026, 4, &groups, &pool, DutyType::OnCall, &TimeProfile::default(), None,
/// );
/// assert_eq!(roster.len(), 30); // one assignment per day
/// ```
#[derive(Debug, Clone)]
pub struct AutoFillScheduler {
    rng: SmallRng,
}

impl AutoFillScheduler {
    /// Creates a scheduler seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates a scheduler with a fixed seed for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Fills one calendar month.
    ///
    /// Returns an empty list for an invalid (year, month) or for empty
    /// `groups`/`resources` — a documented no-op, not a failure.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_month(
        &mut self,
        year: i32,
        month: u32,
        groups: &[Group],
        resources: &[Resource],
        duty_type: DutyType,
        profile: &TimeProfile,
        availability: Option<&AvailabilityIndex>,
    ) -> Vec<Assignment> {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let end = last_day_of_month(start);
        self.fill_range(start, end, groups, resources, duty_type, profile, availability)
    }

    /// Fills every (group, day) slot in `[start, end]` inclusive.
    ///
    /// Produces exactly `groups.len() * days` assignments; empty
    /// `groups`/`resources` or an inverted range yield an empty list.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        groups: &[Group],
        resources: &[Resource],
        duty_type: DutyType,
        profile: &TimeProfile,
        availability: Option<&AvailabilityIndex>,
    ) -> Vec<Assignment> {
        if groups.is_empty() || resources.is_empty() || end < start {
            return Vec::new();
        }

        let days = (end - start).num_days() + 1;
        let target = days_target(days, resources.len());

        let mut result = Vec::with_capacity((days as usize) * groups.len());
        for group in groups {
            // One shuffle per group fixes the tie-break order for the
            // whole month.
            let mut pool: Vec<&Resource> = resources.iter().collect();
            pool.shuffle(&mut self.rng);

            let mut counts: HashMap<&str, i64> =
                pool.iter().map(|r| (r.name.as_str(), 0)).collect();
            let mut last_assigned: HashMap<&str, NaiveDate> = HashMap::new();

            let mut date = start;
            while date <= end {
                let chosen = self.pick_resource(
                    date,
                    days,
                    target,
                    &pool,
                    &counts,
                    &last_assigned,
                    availability,
                );

                result.push(
                    Assignment::new(date, &group.name, &chosen.name, duty_type)
                        .with_profile(profile),
                );
                *counts.entry(chosen.name.as_str()).or_insert(0) += 1;
                last_assigned.insert(chosen.name.as_str(), date);

                match date.succ_opt() {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
        result
    }

    /// Selects the best-scoring candidate for one day.
    #[allow(clippy::too_many_arguments)]
    fn pick_resource<'a>(
        &self,
        date: NaiveDate,
        days: i64,
        target: i64,
        pool: &[&'a Resource],
        counts: &HashMap<&str, i64>,
        last_assigned: &HashMap<&str, NaiveDate>,
        availability: Option<&AvailabilityIndex>,
    ) -> &'a Resource {
        let is_available = |r: &Resource| {
            availability
                .and_then(|idx| idx.get(r.name.as_str()))
                .is_none_or(|dates| !dates.contains(&date))
        };
        let worked_yesterday = |r: &Resource| {
            date.pred_opt()
                .is_some_and(|prev| last_assigned.get(r.name.as_str()) == Some(&prev))
        };

        let available: Vec<&'a Resource> = pool
            .iter()
            .copied()
            .filter(|r| is_available(r))
            .collect();
        let rested: Vec<&'a Resource> = available
            .iter()
            .copied()
            .filter(|r| !worked_yesterday(r))
            .collect();

        // Soft-constraint cascade: drop the consecutive-day rule first,
        // then availability, before ever leaving a slot unfilled.
        let candidates: Vec<&'a Resource> = if !rested.is_empty() {
            rested
        } else if !available.is_empty() {
            available
        } else {
            pool.to_vec()
        };

        let mut best = candidates[0];
        let mut best_score = i64::MIN;
        for &candidate in &candidates {
            let score = self.score(date, days, target, candidate, counts, last_assigned);
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }

    fn score(
        &self,
        date: NaiveDate,
        days: i64,
        target: i64,
        resource: &Resource,
        counts: &HashMap<&str, i64>,
        last_assigned: &HashMap<&str, NaiveDate>,
    ) -> i64 {
        let count = counts.get(resource.name.as_str()).copied().unwrap_or(0);
        // Never assigned means maximal freshness: further back than any
        // day in the range.
        let days_since_last = last_assigned
            .get(resource.name.as_str())
            .map(|&last| (date - last).num_days())
            .unwrap_or(days + 1);

        let mut score = (target - count) * 100 + days_since_last * 10;

        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if weekend && count < target {
            score += 5;
        }
        score
    }
}

impl Default for AutoFillScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// `ceil(days / pool_size)`: the per-person count under a flat spread.
fn days_target(days: i64, pool_size: usize) -> i64 {
    let pool = pool_size as i64;
    (days + pool - 1) / pool
}

/// Last calendar day of the month containing `date`.
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnavailabilityReason;
    use crate::vacation::VacationStore;
    use std::collections::HashMap as StdHashMap;

    fn pool(names: &[&str]) -> Vec<Resource> {
        names.iter().copied().map(Resource::new).collect()
    }

    fn one_group() -> Vec<Group> {
        vec![Group::new("Team A")]
    }

    fn counts_of(assignments: &[Assignment]) -> StdHashMap<String, usize> {
        let mut counts = StdHashMap::new();
        for a in assignments {
            *counts.entry(a.resource_name.clone()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_days_target() {
        assert_eq!(days_target(30, 5), 6);
        assert_eq!(days_target(31, 5), 7);
        assert_eq!(days_target(28, 4), 7);
        assert_eq!(days_target(1, 3), 1);
    }

    #[test]
    fn test_last_day_of_month() {
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert_eq!(last_day_of_month(d(2026, 4, 1)), d(2026, 4, 30));
        assert_eq!(last_day_of_month(d(2026, 12, 1)), d(2026, 12, 31));
        assert_eq!(last_day_of_month(d(2028, 2, 1)), d(2028, 2, 29)); // leap
    }

    #[test]
    fn test_coverage_one_per_group_day() {
        let groups = vec![Group::new("Team A"), Group::new("Team B")];
        let resources = pool(&["A", "B", "C", "D"]);
        let mut scheduler = AutoFillScheduler::with_seed(7);

        let result = scheduler.fill_month(
            2026,
            1,
            &groups,
            &resources,
            DutyType::OnCall,
            &TimeProfile::default(),
            None,
        );
        // 31 days × 2 groups
        assert_eq!(result.len(), 62);
        assert!(result.iter().all(|a| !a.resource_name.is_empty()));

        // Exactly one assignment per (group, day)
        let mut slots = StdHashMap::new();
        for a in &result {
            *slots.entry((a.date, a.group_name.clone())).or_insert(0) += 1;
        }
        assert!(slots.values().all(|&c| c == 1));
    }

    #[test]
    fn test_empty_inputs_are_noops() {
        let mut scheduler = AutoFillScheduler::with_seed(1);
        let profile = TimeProfile::default();

        let no_groups = scheduler.fill_month(
            2026, 1, &[], &pool(&["A"]), DutyType::OnCall, &profile, None,
        );
        assert!(no_groups.is_empty());

        let no_resources =
            scheduler.fill_month(2026, 1, &one_group(), &[], DutyType::OnCall, &profile, None);
        assert!(no_resources.is_empty());

        let bad_month = scheduler.fill_month(
            2026, 13, &one_group(), &pool(&["A"]), DutyType::OnCall, &profile, None,
        );
        assert!(bad_month.is_empty());
    }

    #[test]
    fn test_fairness_convergence_30_days_5_people() {
        // 30 days / 5 people → target 6; counts must differ by at most 1.
        let resources = pool(&["A", "B", "C", "D", "E"]);
        for seed in [1, 99, 4711] {
            let mut scheduler = AutoFillScheduler::with_seed(seed);
            let result = scheduler.fill_month(
                2026,
                4,
                &one_group(),
                &resources,
                DutyType::OnCall,
                &TimeProfile::default(),
                None,
            );
            assert_eq!(result.len(), 30);

            let counts = counts_of(&result);
            assert_eq!(counts.len(), 5);
            let min = counts.values().min().unwrap();
            let max = counts.values().max().unwrap();
            assert!(max - min <= 1, "seed {seed}: spread {min}..{max}");
        }
    }

    #[test]
    fn test_vacation_days_avoided() {
        let resources = pool(&["A", "B", "C"]);
        let mut store = VacationStore::new();
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        store
            .add_range("A", start, end, UnavailabilityReason::Vacation, None)
            .unwrap();
        let index = store.availability_index(Some(start), Some(end));

        let mut scheduler = AutoFillScheduler::with_seed(3);
        let result = scheduler.fill_month(
            2026,
            6,
            &one_group(),
            &resources,
            DutyType::OnCall,
            &TimeProfile::default(),
            Some(&index),
        );
        assert_eq!(result.len(), 30);
        assert!(result.iter().all(|a| a.resource_name != "A"));
    }

    #[test]
    fn test_fully_unavailable_pool_still_assigns() {
        // Availability is a soft constraint: with everyone on vacation,
        // the full pool is used rather than leaving slots open.
        let resources = pool(&["A", "B"]);
        let mut store = VacationStore::new();
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        for name in ["A", "B"] {
            store
                .add_range(name, start, end, UnavailabilityReason::Vacation, None)
                .unwrap();
        }
        let index = store.availability_index(None, None);

        let mut scheduler = AutoFillScheduler::with_seed(3);
        let result = scheduler.fill_month(
            2026,
            6,
            &one_group(),
            &resources,
            DutyType::OnCall,
            &TimeProfile::default(),
            Some(&index),
        );
        assert_eq!(result.len(), 30);
    }

    #[test]
    fn test_two_person_pool_alternates() {
        // With two people the no-consecutive-days rule forces strict
        // alternation; the relaxation never triggers because the rested
        // set always holds the other person.
        let resources = pool(&["A", "B"]);
        let mut scheduler = AutoFillScheduler::with_seed(11);
        let mut result = scheduler.fill_month(
            2026,
            4,
            &one_group(),
            &resources,
            DutyType::OnCall,
            &TimeProfile::default(),
            None,
        );
        result.sort_by_key(|a| a.date);
        for pair in result.windows(2) {
            assert_ne!(pair[0].resource_name, pair[1].resource_name);
        }
    }

    #[test]
    fn test_single_person_pool_relaxes_consecutive_rule() {
        let resources = pool(&["Only"]);
        let mut scheduler = AutoFillScheduler::with_seed(5);
        let result = scheduler.fill_month(
            2026,
            1,
            &one_group(),
            &resources,
            DutyType::OnCall,
            &TimeProfile::default(),
            None,
        );
        assert_eq!(result.len(), 31);
        assert!(result.iter().all(|a| a.resource_name == "Only"));
    }

    #[test]
    fn test_same_seed_reproduces_same_roster() {
        let resources = pool(&["A", "B", "C", "D"]);
        let fill = |seed| {
            AutoFillScheduler::with_seed(seed).fill_month(
                2026,
                4,
                &one_group(),
                &resources,
                DutyType::OnCall,
                &TimeProfile::default(),
                None,
            )
        };
        assert_eq!(fill(42), fill(42));
    }

    #[test]
    fn test_times_follow_profile() {
        let profile = TimeProfile::default().with_on_call("16:00", "07:30");
        let resources = pool(&["A", "B"]);
        let mut scheduler = AutoFillScheduler::with_seed(2);
        let result = scheduler.fill_month(
            2026,
            2,
            &one_group(),
            &resources,
            DutyType::OnCall,
            &profile,
            None,
        );
        assert!(result
            .iter()
            .all(|a| a.start_time == "16:00" && a.end_time == "07:30"));
        assert!(result.iter().all(|a| !a.has_conflict));
    }

    #[test]
    fn test_fill_range_inverted_is_noop() {
        let mut scheduler = AutoFillScheduler::with_seed(1);
        let start = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let result = scheduler.fill_range(
            start,
            end,
            &one_group(),
            &pool(&["A"]),
            DutyType::DayShift,
            &TimeProfile::default(),
            None,
        );
        assert!(result.is_empty());
    }
}
