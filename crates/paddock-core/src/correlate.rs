//! Joins a season schedule with main and sprint results for one entity.
//!
//! The correlator is pure: it reads already-fetched lookups and never issues
//! requests. Entries follow schedule order; nothing is re-sorted by points.
//! Lookups are resolved by the time they get here, so a round missing from
//! one means the entity has no row for it, never that it is still loading.

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::warn;

use crate::data_source::RoundIndex;
use crate::{Constructor, Driver, Race, ResultRow, SessionResultSet};

/// The entity whose season is being correlated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Roster {
    Driver(Driver),
    /// A constructor and the drivers who raced for it, in display order.
    Constructor {
        constructor: Constructor,
        drivers: Vec<Driver>,
    },
}

impl Roster {
    /// Driver ids matched against result rows, in roster order.
    pub fn driver_ids(&self) -> Vec<&str> {
        match self {
            Self::Driver(driver) => vec![driver.id.as_str()],
            Self::Constructor { drivers, .. } => drivers.iter().map(|d| d.id.as_str()).collect(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Driver(driver) => &driver.id,
            Self::Constructor { constructor, .. } => &constructor.id,
        }
    }
}

/// Presentation state of a round's main result for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// Race date is after the evaluation date.
    Upcoming,
    /// The round's result set exists but has no rows.
    NoResults,
    /// No row for the entity: absent from the lookup, or absent from the
    /// round's rows.
    NotClassified,
    Classified,
}

impl RoundState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::NoResults => "no_results",
            Self::NotClassified => "not_classified",
            Self::Classified => "classified",
        }
    }
}

/// One (race, entity) pair of a season view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedRaceEntry {
    pub race: Race,
    pub entity_id: String,
    pub is_upcoming: bool,
    pub main_result: Option<ResultRow>,
    pub sprint_result: Option<ResultRow>,
    pub main_state: RoundState,
}

/// Correlate `schedule` with the main and sprint lookups for `roster`.
///
/// A driver roster yields one entry per race. A constructor roster yields one
/// entry per (race, roster driver), with drivers in roster order inside each
/// round. Races after `as_of` carry no results even when the lookups have
/// data for them. When a set has several rows for the same driver the first
/// one is used.
pub fn correlate(
    schedule: &[Race],
    main_by_round: &RoundIndex,
    sprint_by_round: &RoundIndex,
    roster: &Roster,
    as_of: Date,
) -> Vec<CorrelatedRaceEntry> {
    let driver_ids = roster.driver_ids();
    let mut entries = Vec::with_capacity(schedule.len() * driver_ids.len());

    for race in schedule {
        let is_upcoming = race.is_upcoming(as_of);
        let main_set = main_by_round.get(&race.round);
        let sprint_set = sprint_by_round.get(&race.round);

        for driver_id in &driver_ids {
            let (main_result, main_state) = if is_upcoming {
                (None, RoundState::Upcoming)
            } else {
                match main_set {
                    None => (None, RoundState::NotClassified),
                    Some(set) if set.is_empty() => (None, RoundState::NoResults),
                    Some(set) => match first_match(set, driver_id) {
                        Some(row) => (Some(row), RoundState::Classified),
                        None => (None, RoundState::NotClassified),
                    },
                }
            };

            let sprint_result = if is_upcoming {
                None
            } else {
                sprint_set.and_then(|set| first_match(set, driver_id))
            };

            entries.push(CorrelatedRaceEntry {
                race: race.clone(),
                entity_id: (*driver_id).to_owned(),
                is_upcoming,
                main_result,
                sprint_result,
                main_state,
            });
        }
    }

    entries
}

fn first_match(set: &SessionResultSet, driver_id: &str) -> Option<ResultRow> {
    let mut rows = set.rows_for_driver(driver_id);
    let first = rows.next()?.clone();

    let duplicates = rows.count();
    if duplicates > 0 {
        warn!(
            season = %set.season,
            round = %set.round,
            session = set.kind.as_str(),
            driver = driver_id,
            duplicates,
            "driver appears more than once in a result set; keeping the first row"
        );
    }

    Some(first)
}
