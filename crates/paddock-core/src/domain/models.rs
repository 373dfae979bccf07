use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::calendar::{clock_time, iso_date};
use crate::{Round, Season};

/// Geographic location of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub locality: String,
    pub country: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// Race venue reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub url: Option<String>,
}

/// One scheduled round of a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub season: Season,
    pub round: Round,
    pub name: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "clock_time::option", default)]
    pub time: Option<Time>,
    pub circuit: Circuit,
}

impl Race {
    /// A race is upcoming when its date is strictly after `as_of`; a race
    /// held on `as_of` may already have results.
    pub fn is_upcoming(&self, as_of: Date) -> bool {
        self.date > as_of
    }
}

/// Driver reference record for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub given_name: String,
    pub family_name: String,
    pub permanent_number: Option<u32>,
    pub code: Option<String>,
    #[serde(with = "iso_date::option", default)]
    pub date_of_birth: Option<Date>,
    pub nationality: Option<String>,
    pub url: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// Completed years of age on `today`, counting the birthday itself.
    ///
    /// This is the single age definition used for both display and sorting.
    pub fn age_on(&self, today: Date) -> Option<u32> {
        let born = self.date_of_birth?;
        let mut age = today.year() - born.year();
        let birthday_pending =
            (u8::from(today.month()), today.day()) < (u8::from(born.month()), born.day());
        if birthday_pending {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

/// Constructor (team) reference record for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    pub id: String,
    pub name: String,
    pub nationality: Option<String>,
    pub url: Option<String>,
}

/// Classification of one car in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "place", rename_all = "snake_case")]
pub enum Position {
    Classified(u32),
    Retired,
    Disqualified,
    Excluded,
    Withdrawn,
    NotClassified,
    FailedToQualify,
}

impl Position {
    /// Decode the API's `positionText`, which carries either the finishing
    /// place or a single-letter non-finish marker.
    pub fn from_position_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(place) = trimmed.parse::<u32>() {
            return Self::Classified(place);
        }

        match trimmed {
            "R" => Self::Retired,
            "D" => Self::Disqualified,
            "E" => Self::Excluded,
            "W" => Self::Withdrawn,
            "F" => Self::FailedToQualify,
            _ => Self::NotClassified,
        }
    }

    /// Short label as shown in result tables (`P3`, `DNF`, `DSQ`...).
    pub fn label(self) -> String {
        match self {
            Self::Classified(place) => format!("P{place}"),
            Self::Retired => String::from("DNF"),
            Self::Disqualified => String::from("DSQ"),
            Self::Excluded => String::from("EX"),
            Self::Withdrawn => String::from("WD"),
            Self::NotClassified => String::from("NC"),
            Self::FailedToQualify => String::from("DNQ"),
        }
    }
}

/// One entity's outcome in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub number: Option<u32>,
    pub position: Position,
    /// Raw finishing order, populated for every starter including retirements.
    pub order: Option<u32>,
    pub points: f64,
    pub grid: Option<u32>,
    pub laps: Option<u32>,
    /// Free-text finish status (`Finished`, `+1 Lap`, `Engine`...).
    pub status: Option<String>,
    /// Elapsed race time for the winner, gap to the leader for other finishers.
    pub time: Option<String>,
    pub driver: Driver,
    pub constructor: Constructor,
}

impl ResultRow {
    pub fn driver_id(&self) -> &str {
        &self.driver.id
    }

    /// Time column text: elapsed/gap when the car finished, status otherwise.
    pub fn time_or_status(&self) -> Option<&str> {
        self.time.as_deref().or(self.status.as_deref())
    }
}

/// Which race session a result set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Main,
    Sprint,
}

impl SessionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sprint => "sprint",
        }
    }
}

/// Classification of one session of one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResultSet {
    pub season: Season,
    pub round: Round,
    pub kind: SessionKind,
    pub rows: Vec<ResultRow>,
}

impl SessionResultSet {
    pub fn new(season: Season, round: Round, kind: SessionKind, rows: Vec<ResultRow>) -> Self {
        Self {
            season,
            round,
            kind,
            rows,
        }
    }

    pub fn empty(season: Season, round: Round, kind: SessionKind) -> Self {
        Self::new(season, round, kind, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// All rows recorded for a driver, in classification order.
    pub fn rows_for_driver<'a>(
        &'a self,
        driver_id: &'a str,
    ) -> impl Iterator<Item = &'a ResultRow> + 'a {
        self.rows.iter().filter(move |row| row.driver_id() == driver_id)
    }
}

/// The ranked party of a standings entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StandingEntity {
    Driver {
        driver: Driver,
        constructors: Vec<Constructor>,
    },
    Constructor {
        constructor: Constructor,
    },
}

impl StandingEntity {
    pub fn id(&self) -> &str {
        match self {
            Self::Driver { driver, .. } => &driver.id,
            Self::Constructor { constructor } => &constructor.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Driver { driver, .. } => driver.full_name(),
            Self::Constructor { constructor } => constructor.name.clone(),
        }
    }
}

/// Season-to-date ranking row.
///
/// Points are kept in the API's string form; consumers parse them where a
/// numeric value is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub position: Option<u32>,
    pub position_text: String,
    pub points: String,
    pub wins: u32,
    pub entity: StandingEntity,
}
