//! Workload fairness scoring.
//!
//! Pure, stateless metrics over per-person assignment counts. The
//! distribution score is a deliberately simple spread penalty — cheap
//! to compute and easy to explain to a planning coordinator — rather
//! than a statistical fairness index.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Distribution score | `100 − 5·(max − min)`, clamped to `[0, 100]` |
//! | Std deviation | Population stddev of counts (÷ N) |
//! | Load status | deviation > 2 → overloaded, < −2 → underloaded |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Resource};

/// Spread-based distribution quality score in `[0, 100]`.
///
/// `100 − 5·(max − min)`, clamped at 0: every unit of spread between
/// the most and least loaded person costs 5 points, so a spread of 20
/// or more scores 0. Empty input is vacuously fair (100).
///
/// # Example
///
/// ```
/// use duty_roster::fairness::distribution_score;
///
/// assert_eq!(distribution_score(&[6, 6, 6]), 100.0);
/// assert_eq!(distribution_score(&[8, 4]), 80.0);
/// assert_eq!(distribution_score(&[]), 100.0);
/// ```
pub fn distribution_score(counts: &[usize]) -> f64 {
    let Some(&max) = counts.iter().max() else {
        return 100.0;
    };
    let min = *counts.iter().min().unwrap_or(&0);
    (100.0 - 5.0 * (max - min) as f64).max(0.0)
}

/// Population standard deviation of counts (divide by N, not N−1).
///
/// Empty input yields 0.
pub fn std_deviation(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let n = counts.len() as f64;
    let mean = counts.iter().sum::<usize>() as f64 / n;
    let variance = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Per-resource load classification relative to the pool average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// More than 2 assignments above average.
    Overloaded,
    /// More than 2 assignments below average.
    Underloaded,
    /// Within ±2 of average.
    Balanced,
}

/// One resource's share of the workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLoad {
    /// Resource name.
    pub resource_name: String,
    /// Assignment count.
    pub count: usize,
    /// Signed deviation from the pool average.
    pub deviation: f64,
    /// Three-tier classification of the deviation.
    pub status: LoadStatus,
}

/// Fairness summary over an assignment set and a resource pool.
///
/// Recomputed on demand; never cached beyond a single report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    /// Per-resource loads, sorted by resource name.
    pub loads: Vec<ResourceLoad>,
    /// Smallest per-resource count.
    pub min_count: usize,
    /// Largest per-resource count.
    pub max_count: usize,
    /// Mean count across the pool.
    pub average: f64,
    /// Population standard deviation of the counts.
    pub std_deviation: f64,
    /// Distribution score in `[0, 100]`.
    pub score: f64,
}

impl FairnessReport {
    /// Summarizes the workload of `assignments` across `pool`.
    ///
    /// Pool members with no assignments are included at count 0, not
    /// omitted — an untouched person is part of the distribution.
    pub fn summarize(assignments: &[Assignment], pool: &[Resource]) -> Self {
        let mut counts: HashMap<&str, usize> =
            pool.iter().map(|r| (r.name.as_str(), 0)).collect();
        for a in assignments {
            if let Some(count) = counts.get_mut(a.resource_name.as_str()) {
                *count += 1;
            }
        }

        let count_values: Vec<usize> = counts.values().copied().collect();
        let min_count = count_values.iter().copied().min().unwrap_or(0);
        let max_count = count_values.iter().copied().max().unwrap_or(0);
        let average = if count_values.is_empty() {
            0.0
        } else {
            count_values.iter().sum::<usize>() as f64 / count_values.len() as f64
        };

        let mut loads: Vec<ResourceLoad> = counts
            .into_iter()
            .map(|(name, count)| {
                let deviation = count as f64 - average;
                let status = if deviation > 2.0 {
                    LoadStatus::Overloaded
                } else if deviation < -2.0 {
                    LoadStatus::Underloaded
                } else {
                    LoadStatus::Balanced
                };
                ResourceLoad {
                    resource_name: name.to_string(),
                    count,
                    deviation,
                    status,
                }
            })
            .collect();
        loads.sort_by(|a, b| a.resource_name.cmp(&b.resource_name));

        Self {
            loads,
            min_count,
            max_count,
            average,
            std_deviation: std_deviation(&count_values),
            score: distribution_score(&count_values),
        }
    }
}
