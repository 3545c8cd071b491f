//! Roster auto-fill.
//!
//! Provides the greedy fairness-weighted month scheduler.
//!
//! # Algorithm
//!
//! `AutoFillScheduler` walks the target range day by day per group,
//! scoring every candidate against a flat per-person target and
//! picking the highest. Availability and the no-consecutive-days rule
//! are soft constraints — every (group, day) slot always gets exactly
//! one assignment.

mod autofill;

pub use autofill::AutoFillScheduler;
