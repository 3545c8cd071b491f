//! On-call duty roster engine ("Bereitschaftsdienst" planning).
//!
//! Provides the scheduling core for field-service on-call rosters:
//! fairness-weighted auto-assignment, conflict detection, vacation
//! tracking, and scenario comparison. Import/export adapters, UI, and
//! holiday lookup live in the host application — this crate is a pure
//! computation engine over plain assignment records.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Resource`, `Group`, `Assignment`,
//!   `Roster`, `DutyType`, `TimeProfile`, `UnavailabilityRecord`
//! - **`vacation`**: Per-person unavailability store with range upsert
//!   and availability queries
//! - **`fairness`**: Distribution scoring and per-resource load reports
//! - **`scheduler`**: Greedy fairness-weighted month auto-fill
//! - **`conflict`**: Double-booking, overload, vacation-collision and
//!   imbalance detection, with fix suggestions
//! - **`scenario`**: Named roster snapshots with cached metrics,
//!   baseline flag, and diffing
//! - **`storage`**: Generic repository abstraction (any key-value or
//!   relational store can back the engine)
//! - **`validation`**: Input integrity checks (duplicate names, empty
//!   pools, inverted date ranges)
//!
//! # Architecture
//!
//! All public operations are synchronous, side-effect-free computations
//! over an input snapshot; the only persistent state lives behind the
//! repository trait. Components are wired by explicit construction —
//! the host application owns the composition root.

pub mod conflict;
pub mod error;
pub mod fairness;
pub mod models;
pub mod scenario;
pub mod scheduler;
pub mod storage;
pub mod vacation;
pub mod validation;

pub use error::RosterError;
