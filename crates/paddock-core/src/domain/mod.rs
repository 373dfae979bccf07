//! # Domain Models
//!
//! Season-scoped Formula 1 reference data and session results.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Season`] | Validated four-digit championship year |
//! | [`Round`] | Validated positive round number, ordered numerically |
//! | [`Race`] | Scheduled round with date, optional UTC time and circuit |
//! | [`Driver`] / [`Constructor`] / [`Circuit`] | Reference records keyed by stable ids |
//! | [`ResultRow`] | One car's classification in one session |
//! | [`SessionResultSet`] | All rows of a main or sprint session |
//! | [`StandingEntry`] | Season-to-date ranking row |
//!
//! Optional API fields stay optional here: a missing value means "no data",
//! never zero or an empty string.

pub mod calendar;
mod models;
mod season;

pub use models::{
    Circuit, Constructor, Driver, Location, Position, Race, ResultRow, SessionKind,
    SessionResultSet, StandingEntity, StandingEntry,
};
pub use season::{Round, Season};
