//! Season views assembled from one request-scoped fetcher.
//!
//! A [`SeasonView`] owns a single [`ResultFetcher`], so every request made
//! while building its views is issued at most once. Drop the view to drop
//! the cache.
//!
//! # Failure policy
//!
//! | Request | On failure |
//! |---------|------------|
//! | Schedule | the whole view fails |
//! | Main results | the requested view or race detail fails |
//! | Sprint fan-out | round treated as sprint-free, logged |
//! | Standings / catalog | the requested table fails |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::info;

use crate::adapters::JolpicaAdapter;
use crate::aggregate::aggregate_sprints;
use crate::config::FetchConfig;
use crate::correlate::{correlate, CorrelatedRaceEntry, Roster};
use crate::data_source::{DataSource, EntityRef, RoundIndex};
use crate::domain::calendar::iso_date;
use crate::fetcher::ResultFetcher;
use crate::sort::{sort_drivers, SortDirection, SortField};
use crate::standings::{with_gaps, GappedStanding};
use crate::{
    Circuit, Constructor, CoreError, Driver, Race, ResultRow, Round, Season, SessionKind,
    ValidationError,
};

/// Correlated season of one driver or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySeason {
    pub season: Season,
    #[serde(with = "iso_date")]
    pub as_of: Date,
    pub roster: Roster,
    pub entries: Vec<CorrelatedRaceEntry>,
}

/// A circuit and the rounds of the season held there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDetail {
    pub circuit: Circuit,
    pub races: Vec<Race>,
}

/// Classification of one session of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceDetail {
    pub race: Race,
    pub kind: SessionKind,
    pub rows: Vec<ResultRow>,
}

pub struct SeasonView {
    season: Season,
    fetcher: ResultFetcher,
    concurrency: usize,
}

impl SeasonView {
    pub fn new(source: Arc<dyn DataSource>, season: Season, config: &FetchConfig) -> Self {
        Self {
            season,
            fetcher: ResultFetcher::new(source, config),
            concurrency: config.max_concurrency.max(1),
        }
    }

    /// View backed by the public Jolpica API.
    pub fn from_config(season: Season, config: FetchConfig) -> Self {
        let adapter = JolpicaAdapter::new(config.clone());
        Self::new(Arc::new(adapter), season, &config)
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn fetcher(&self) -> &ResultFetcher {
        &self.fetcher
    }

    pub async fn schedule(&self) -> Result<Arc<Vec<Race>>, CoreError> {
        Ok(self.fetcher.schedule(self.season).await?)
    }

    /// Rounds that held a sprint, keyed by round.
    pub async fn sprints(&self) -> Result<RoundIndex, CoreError> {
        let schedule = self.schedule().await?;
        Ok(aggregate_sprints(&self.fetcher, self.season, &schedule, self.concurrency).await)
    }

    pub async fn driver_view(
        &self,
        driver_id: &str,
        as_of: Date,
    ) -> Result<EntitySeason, CoreError> {
        let driver_id = require_id(driver_id)?;
        let entity = EntityRef::Driver(driver_id.to_owned());

        let (schedule, driver, main) = tokio::join!(
            self.fetcher.schedule(self.season),
            self.fetcher.driver(self.season, driver_id),
            self.fetcher.entity_results(self.season, &entity),
        );
        let schedule = schedule?;
        let driver = (*driver?)
            .clone()
            .ok_or_else(|| self.unknown("driver", driver_id))?;
        let main = main?;

        let sprints =
            aggregate_sprints(&self.fetcher, self.season, &schedule, self.concurrency).await;
        let roster = Roster::Driver(driver);

        Ok(self.assemble(&schedule, &main, &sprints, roster, as_of))
    }

    pub async fn constructor_view(
        &self,
        constructor_id: &str,
        as_of: Date,
    ) -> Result<EntitySeason, CoreError> {
        let constructor_id = require_id(constructor_id)?;
        let entity = EntityRef::Constructor(constructor_id.to_owned());

        let (schedule, constructors, drivers, main) = tokio::join!(
            self.fetcher.schedule(self.season),
            self.fetcher.constructors(self.season),
            self.fetcher.constructor_drivers(self.season, constructor_id),
            self.fetcher.entity_results(self.season, &entity),
        );
        let schedule = schedule?;
        let constructor = constructors?
            .iter()
            .find(|constructor| constructor.id == constructor_id)
            .cloned()
            .ok_or_else(|| self.unknown("constructor", constructor_id))?;
        let drivers = (*drivers?).clone();
        let main = main?;

        let sprints =
            aggregate_sprints(&self.fetcher, self.season, &schedule, self.concurrency).await;
        let roster = Roster::Constructor {
            constructor,
            drivers,
        };

        Ok(self.assemble(&schedule, &main, &sprints, roster, as_of))
    }

    /// One round's classification. A sprint request for a round without a
    /// sprint returns an empty row list.
    pub async fn race_detail(
        &self,
        round: Round,
        kind: SessionKind,
    ) -> Result<RaceDetail, CoreError> {
        let (schedule, results) = tokio::join!(
            self.fetcher.schedule(self.season),
            self.fetcher.session_results(self.season, round, kind),
        );

        let race = schedule?
            .iter()
            .find(|race| race.round == round)
            .cloned()
            .ok_or_else(|| self.unknown("round", &round.to_string()))?;
        let results = results?;

        Ok(RaceDetail {
            race,
            kind,
            rows: results.rows.clone(),
        })
    }

    pub async fn driver_standings(&self) -> Result<Vec<GappedStanding>, CoreError> {
        let standings = self.fetcher.driver_standings(self.season).await?;
        Ok(with_gaps(&standings)?)
    }

    pub async fn constructor_standings(&self) -> Result<Vec<GappedStanding>, CoreError> {
        let standings = self.fetcher.constructor_standings(self.season).await?;
        Ok(with_gaps(&standings)?)
    }

    pub async fn drivers(
        &self,
        field: SortField,
        direction: SortDirection,
        today: Date,
    ) -> Result<Vec<Driver>, CoreError> {
        let drivers = self.fetcher.drivers(self.season).await?;
        Ok(sort_drivers(&drivers, field, direction, today))
    }

    pub async fn constructors(&self) -> Result<Arc<Vec<Constructor>>, CoreError> {
        Ok(self.fetcher.constructors(self.season).await?)
    }

    pub async fn circuits(&self) -> Result<Arc<Vec<Circuit>>, CoreError> {
        Ok(self.fetcher.circuits(self.season).await?)
    }

    pub async fn circuit(&self, circuit_id: &str) -> Result<CircuitDetail, CoreError> {
        let circuit_id = require_id(circuit_id)?;

        let (circuit, schedule) = tokio::join!(
            self.fetcher.circuit(self.season, circuit_id),
            self.fetcher.schedule(self.season),
        );
        let circuit = (*circuit?)
            .clone()
            .ok_or_else(|| self.unknown("circuit", circuit_id))?;
        let races = schedule?
            .iter()
            .filter(|race| race.circuit.id == circuit.id)
            .cloned()
            .collect();

        Ok(CircuitDetail { circuit, races })
    }

    fn assemble(
        &self,
        schedule: &[Race],
        main: &RoundIndex,
        sprints: &RoundIndex,
        roster: Roster,
        as_of: Date,
    ) -> EntitySeason {
        let entries = correlate(schedule, main, sprints, &roster, as_of);
        info!(
            season = %self.season,
            entity = roster.id(),
            races = schedule.len(),
            entries = entries.len(),
            sprints = sprints.len(),
            "season view assembled"
        );

        EntitySeason {
            season: self.season,
            as_of,
            roster,
            entries,
        }
    }

    fn unknown(&self, kind: &'static str, id: &str) -> ValidationError {
        ValidationError::UnknownEntity {
            kind,
            id: id.to_owned(),
            season: self.season.to_string(),
        }
    }
}

impl std::fmt::Debug for SeasonView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeasonView")
            .field("season", &self.season)
            .field("concurrency", &self.concurrency)
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

fn require_id(id: &str) -> Result<&str, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    Ok(trimmed)
}
