//! Data source trait, request keys and fetch failures.
//!
//! # Request kinds
//!
//! | Kind | Key | Response |
//! |------|-----|----------|
//! | Schedule | season | `Vec<Race>` |
//! | Main / Sprint | season + round | [`SessionResultSet`] |
//! | Driver / constructor standings | season | `Vec<StandingEntry>` |
//! | Drivers / constructors / circuits | season | catalog records |
//! | Driver | season + driver id | `Option<Driver>` |
//! | Circuit | season + circuit id | `Option<Circuit>` |
//! | Constructor drivers | season + constructor id | `Vec<Driver>` |
//! | Driver / constructor results | season + entity id | [`RoundIndex`] |
//!
//! A well-formed empty response is a success. Only transport problems,
//! timeouts, non-2xx statuses and undecodable bodies are [`FetchFailure`]s.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Circuit, Constructor, Driver, Race, Round, Season, SessionKind, SessionResultSet,
    StandingEntry,
};

/// Session result sets indexed by round.
pub type RoundIndex = BTreeMap<Round, Arc<SessionResultSet>>;

/// Request category used for cache keys and failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Schedule,
    Main,
    Sprint,
    DriverStandings,
    ConstructorStandings,
    Drivers,
    Constructors,
    Circuits,
    Driver,
    Circuit,
    ConstructorDrivers,
    DriverResults,
    ConstructorResults,
}

impl ResultKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Main => "main",
            Self::Sprint => "sprint",
            Self::DriverStandings => "driver_standings",
            Self::ConstructorStandings => "constructor_standings",
            Self::Drivers => "drivers",
            Self::Constructors => "constructors",
            Self::Circuits => "circuits",
            Self::Driver => "driver",
            Self::Circuit => "circuit",
            Self::ConstructorDrivers => "constructor_drivers",
            Self::DriverResults => "driver_results",
            Self::ConstructorResults => "constructor_results",
        }
    }

    pub const fn session(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Main => Self::Main,
            SessionKind::Sprint => Self::Sprint,
        }
    }
}

impl Display for ResultKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one upstream request.
///
/// Two requests with equal keys are interchangeable, which is what makes
/// request de-duplication safe. Constructors enforce that a round is present
/// exactly for the per-round kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey {
    pub season: Season,
    pub round: Option<Round>,
    pub kind: ResultKind,
    pub entity: Option<String>,
}

impl FetchKey {
    fn new(season: Season, round: Option<Round>, kind: ResultKind, entity: Option<String>) -> Self {
        Self {
            season,
            round,
            kind,
            entity,
        }
    }

    pub fn schedule(season: Season) -> Self {
        Self::new(season, None, ResultKind::Schedule, None)
    }

    pub fn session(season: Season, round: Round, kind: SessionKind) -> Self {
        Self::new(season, Some(round), ResultKind::session(kind), None)
    }

    pub fn main(season: Season, round: Round) -> Self {
        Self::session(season, round, SessionKind::Main)
    }

    pub fn sprint(season: Season, round: Round) -> Self {
        Self::session(season, round, SessionKind::Sprint)
    }

    pub fn driver_standings(season: Season) -> Self {
        Self::new(season, None, ResultKind::DriverStandings, None)
    }

    pub fn constructor_standings(season: Season) -> Self {
        Self::new(season, None, ResultKind::ConstructorStandings, None)
    }

    pub fn drivers(season: Season) -> Self {
        Self::new(season, None, ResultKind::Drivers, None)
    }

    pub fn constructors(season: Season) -> Self {
        Self::new(season, None, ResultKind::Constructors, None)
    }

    pub fn circuits(season: Season) -> Self {
        Self::new(season, None, ResultKind::Circuits, None)
    }

    pub fn driver(season: Season, driver_id: impl Into<String>) -> Self {
        Self::new(season, None, ResultKind::Driver, Some(driver_id.into()))
    }

    pub fn circuit(season: Season, circuit_id: impl Into<String>) -> Self {
        Self::new(season, None, ResultKind::Circuit, Some(circuit_id.into()))
    }

    pub fn constructor_drivers(season: Season, constructor_id: impl Into<String>) -> Self {
        Self::new(
            season,
            None,
            ResultKind::ConstructorDrivers,
            Some(constructor_id.into()),
        )
    }

    pub fn entity_results(season: Season, entity: &EntityRef) -> Self {
        let kind = match entity {
            EntityRef::Driver(_) => ResultKind::DriverResults,
            EntityRef::Constructor(_) => ResultKind::ConstructorResults,
        };
        Self::new(season, None, kind, Some(entity.id().to_owned()))
    }
}

impl Display for FetchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.season)?;
        if let Some(round) = self.round {
            write!(f, "/{round}")?;
        }
        write!(f, "/{}", self.kind)?;
        if let Some(entity) = &self.entity {
            write!(f, ":{entity}")?;
        }
        Ok(())
    }
}

/// Entity whose season results are requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Driver(String),
    Constructor(String),
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Driver(id) | Self::Constructor(id) => id,
        }
    }
}

/// Classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Transport,
    Timeout,
    Status(u16),
    Decode,
}

impl Display for FetchFailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => f.write_str("transport error"),
            Self::Timeout => f.write_str("timeout"),
            Self::Status(status) => write!(f, "status {status}"),
            Self::Decode => f.write_str("decode error"),
        }
    }
}

/// A request that did not produce a usable response, tagged with its key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} fetching {key}: {message}")]
pub struct FetchFailure {
    key: FetchKey,
    kind: FetchFailureKind,
    message: String,
}

impl FetchFailure {
    pub fn new(key: FetchKey, kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            key,
            kind,
            message: message.into(),
        }
    }

    pub fn transport(key: FetchKey, message: impl Into<String>) -> Self {
        Self::new(key, FetchFailureKind::Transport, message)
    }

    pub fn timeout(key: FetchKey, timeout_ms: u64) -> Self {
        Self::new(
            key,
            FetchFailureKind::Timeout,
            format!("no response within {timeout_ms}ms"),
        )
    }

    pub fn status(key: FetchKey, status: u16) -> Self {
        Self::new(
            key,
            FetchFailureKind::Status(status),
            format!("upstream returned status {status}"),
        )
    }

    pub fn decode(key: FetchKey, message: impl Into<String>) -> Self {
        Self::new(key, FetchFailureKind::Decode, message)
    }

    pub fn key(&self) -> &FetchKey {
        &self.key
    }

    pub const fn kind(&self) -> FetchFailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchFailureKind::Transport => "fetch.transport",
            FetchFailureKind::Timeout => "fetch.timeout",
            FetchFailureKind::Status(_) => "fetch.status",
            FetchFailureKind::Decode => "fetch.decode",
        }
    }
}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchFailure>> + Send + 'a>>;

/// Read-only Formula 1 data provider.
///
/// Implementations perform exactly one upstream call per method invocation
/// and never cache; de-duplication is the [`ResultFetcher`](crate::ResultFetcher)'s job.
pub trait DataSource: Send + Sync {
    /// Season calendar in round order.
    fn schedule<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Race>>;

    /// Classification of one session. A session that was never held yields
    /// an empty set, not an error.
    fn session_results<'a>(
        &'a self,
        season: Season,
        round: Round,
        kind: SessionKind,
    ) -> SourceFuture<'a, SessionResultSet>;

    fn driver_standings<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<StandingEntry>>;

    fn constructor_standings<'a>(&'a self, season: Season)
        -> SourceFuture<'a, Vec<StandingEntry>>;

    fn drivers<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Driver>>;

    fn constructors<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Constructor>>;

    fn circuits<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Circuit>>;

    fn driver<'a>(&'a self, season: Season, driver_id: &'a str) -> SourceFuture<'a, Option<Driver>>;

    /// `None` when no race of the season was held at the circuit.
    fn circuit<'a>(
        &'a self,
        season: Season,
        circuit_id: &'a str,
    ) -> SourceFuture<'a, Option<Circuit>>;

    fn constructor_drivers<'a>(
        &'a self,
        season: Season,
        constructor_id: &'a str,
    ) -> SourceFuture<'a, Vec<Driver>>;

    /// Main-race results of one driver or constructor across the season,
    /// indexed by round. Rounds the entity did not take part in are absent.
    fn entity_results<'a>(
        &'a self,
        season: Season,
        entity: &'a EntityRef,
    ) -> SourceFuture<'a, RoundIndex>;
}
