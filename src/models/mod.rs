//! Duty-roster domain models.
//!
//! Plain value records exchanged between the scheduling core and the
//! host application's import/export adapters. No observable/bound
//! state — mutation happens through explicit operations on [`Roster`].

mod assignment;
mod resource;
mod roster;
mod unavailability;

pub use assignment::{Assignment, DutyType, SlotKey, TimeProfile};
pub use resource::{Group, Resource};
pub use roster::Roster;
pub use unavailability::{UnavailabilityReason, UnavailabilityRecord};
