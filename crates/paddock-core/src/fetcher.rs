//! Request-scoped, de-duplicating front for a [`DataSource`].
//!
//! Every request goes through a per-key [`RequestCache`]: the first caller
//! issues the upstream call, concurrent callers share it, and the outcome
//! (success or failure) is kept for the fetcher's lifetime. Each upstream
//! call first waits for the [`RequestPacer`] and is bounded by the configured
//! timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::RequestCache;
use crate::config::FetchConfig;
use crate::data_source::{
    DataSource, EntityRef, FetchFailure, FetchKey, ResultKind, RoundIndex, SourceFuture,
};
use crate::pacing::RequestPacer;
use crate::{
    Circuit, Constructor, CoreError, Driver, Race, Round, Season, SessionKind, SessionResultSet,
    StandingEntry, ValidationError,
};

/// Payload of a keyed fetch.
#[derive(Debug, Clone)]
pub enum Fetched {
    Schedule(Arc<Vec<Race>>),
    Session(Arc<SessionResultSet>),
    Standings(Arc<Vec<StandingEntry>>),
    Drivers(Arc<Vec<Driver>>),
    Constructors(Arc<Vec<Constructor>>),
    Circuits(Arc<Vec<Circuit>>),
    Driver(Arc<Option<Driver>>),
    Circuit(Arc<Option<Circuit>>),
    RoundResults(Arc<RoundIndex>),
}

pub struct ResultFetcher {
    source: Arc<dyn DataSource>,
    pacer: RequestPacer,
    timeout_ms: u64,
    schedules: RequestCache<Vec<Race>>,
    sessions: RequestCache<SessionResultSet>,
    standings: RequestCache<Vec<StandingEntry>>,
    rosters: RequestCache<Vec<Driver>>,
    constructors: RequestCache<Vec<Constructor>>,
    circuits: RequestCache<Vec<Circuit>>,
    drivers: RequestCache<Option<Driver>>,
    circuit_lookups: RequestCache<Option<Circuit>>,
    entity_results: RequestCache<RoundIndex>,
}

impl ResultFetcher {
    pub fn new(source: Arc<dyn DataSource>, config: &FetchConfig) -> Self {
        Self {
            source,
            pacer: RequestPacer::from_config(config),
            timeout_ms: config.timeout_ms,
            schedules: RequestCache::new(),
            sessions: RequestCache::new(),
            standings: RequestCache::new(),
            rosters: RequestCache::new(),
            constructors: RequestCache::new(),
            circuits: RequestCache::new(),
            drivers: RequestCache::new(),
            circuit_lookups: RequestCache::new(),
            entity_results: RequestCache::new(),
        }
    }

    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Zero disables the per-fetch timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Dispatch on the key's kind.
    ///
    /// Fails with [`ValidationError::IncompleteKey`] when a per-round kind has
    /// no round or an entity kind has no entity id.
    pub async fn fetch(&self, key: &FetchKey) -> Result<Fetched, CoreError> {
        let season = key.season;
        let fetched = match key.kind {
            ResultKind::Schedule => Fetched::Schedule(self.schedule(season).await?),
            ResultKind::Main => {
                Fetched::Session(self.main_results(season, require_round(key)?).await?)
            }
            ResultKind::Sprint => {
                Fetched::Session(self.sprint_results(season, require_round(key)?).await?)
            }
            ResultKind::DriverStandings => {
                Fetched::Standings(self.driver_standings(season).await?)
            }
            ResultKind::ConstructorStandings => {
                Fetched::Standings(self.constructor_standings(season).await?)
            }
            ResultKind::Drivers => Fetched::Drivers(self.drivers(season).await?),
            ResultKind::Constructors => Fetched::Constructors(self.constructors(season).await?),
            ResultKind::Circuits => Fetched::Circuits(self.circuits(season).await?),
            ResultKind::Driver => Fetched::Driver(self.driver(season, require_entity(key)?).await?),
            ResultKind::Circuit => {
                Fetched::Circuit(self.circuit(season, require_entity(key)?).await?)
            }
            ResultKind::ConstructorDrivers => Fetched::Drivers(
                self.constructor_drivers(season, require_entity(key)?)
                    .await?,
            ),
            ResultKind::DriverResults => {
                let entity = EntityRef::Driver(require_entity(key)?.to_owned());
                Fetched::RoundResults(self.entity_results(season, &entity).await?)
            }
            ResultKind::ConstructorResults => {
                let entity = EntityRef::Constructor(require_entity(key)?.to_owned());
                Fetched::RoundResults(self.entity_results(season, &entity).await?)
            }
        };
        Ok(fetched)
    }

    pub async fn schedule(&self, season: Season) -> Result<Arc<Vec<Race>>, FetchFailure> {
        let key = FetchKey::schedule(season);
        self.schedules
            .get_or_fetch(key.clone(), || self.guarded(key, self.source.schedule(season)))
            .await
    }

    pub async fn session_results(
        &self,
        season: Season,
        round: Round,
        kind: SessionKind,
    ) -> Result<Arc<SessionResultSet>, FetchFailure> {
        let key = FetchKey::session(season, round, kind);
        self.sessions
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.session_results(season, round, kind))
            })
            .await
    }

    pub async fn main_results(
        &self,
        season: Season,
        round: Round,
    ) -> Result<Arc<SessionResultSet>, FetchFailure> {
        self.session_results(season, round, SessionKind::Main).await
    }

    pub async fn sprint_results(
        &self,
        season: Season,
        round: Round,
    ) -> Result<Arc<SessionResultSet>, FetchFailure> {
        self.session_results(season, round, SessionKind::Sprint)
            .await
    }

    pub async fn driver_standings(
        &self,
        season: Season,
    ) -> Result<Arc<Vec<StandingEntry>>, FetchFailure> {
        let key = FetchKey::driver_standings(season);
        self.standings
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.driver_standings(season))
            })
            .await
    }

    pub async fn constructor_standings(
        &self,
        season: Season,
    ) -> Result<Arc<Vec<StandingEntry>>, FetchFailure> {
        let key = FetchKey::constructor_standings(season);
        self.standings
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.constructor_standings(season))
            })
            .await
    }

    pub async fn drivers(&self, season: Season) -> Result<Arc<Vec<Driver>>, FetchFailure> {
        let key = FetchKey::drivers(season);
        self.rosters
            .get_or_fetch(key.clone(), || self.guarded(key, self.source.drivers(season)))
            .await
    }

    pub async fn constructors(
        &self,
        season: Season,
    ) -> Result<Arc<Vec<Constructor>>, FetchFailure> {
        let key = FetchKey::constructors(season);
        self.constructors
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.constructors(season))
            })
            .await
    }

    pub async fn circuits(&self, season: Season) -> Result<Arc<Vec<Circuit>>, FetchFailure> {
        let key = FetchKey::circuits(season);
        self.circuits
            .get_or_fetch(key.clone(), || self.guarded(key, self.source.circuits(season)))
            .await
    }

    /// `None` when the driver did not take part in the season.
    pub async fn driver(
        &self,
        season: Season,
        driver_id: &str,
    ) -> Result<Arc<Option<Driver>>, FetchFailure> {
        let key = FetchKey::driver(season, driver_id);
        self.drivers
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.driver(season, driver_id))
            })
            .await
    }

    /// `None` when the circuit is not on the season's calendar.
    pub async fn circuit(
        &self,
        season: Season,
        circuit_id: &str,
    ) -> Result<Arc<Option<Circuit>>, FetchFailure> {
        let key = FetchKey::circuit(season, circuit_id);
        self.circuit_lookups
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.circuit(season, circuit_id))
            })
            .await
    }

    pub async fn constructor_drivers(
        &self,
        season: Season,
        constructor_id: &str,
    ) -> Result<Arc<Vec<Driver>>, FetchFailure> {
        let key = FetchKey::constructor_drivers(season, constructor_id);
        self.rosters
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.constructor_drivers(season, constructor_id))
            })
            .await
    }

    pub async fn entity_results(
        &self,
        season: Season,
        entity: &EntityRef,
    ) -> Result<Arc<RoundIndex>, FetchFailure> {
        let key = FetchKey::entity_results(season, entity);
        self.entity_results
            .get_or_fetch(key.clone(), || {
                self.guarded(key, self.source.entity_results(season, entity))
            })
            .await
    }

    async fn guarded<T>(
        &self,
        key: FetchKey,
        request: SourceFuture<'_, T>,
    ) -> Result<T, FetchFailure> {
        if self.pacer.acquire().await {
            debug!(key = %key, "request budget exhausted, waited for a token");
        }
        debug!(key = %key, "fetching");

        if self.timeout_ms == 0 {
            return request.await;
        }

        match tokio::time::timeout(Duration::from_millis(self.timeout_ms), request).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchFailure::timeout(key, self.timeout_ms)),
        }
    }
}

impl std::fmt::Debug for ResultFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultFetcher")
            .field("pacer", &self.pacer)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn require_round(key: &FetchKey) -> Result<Round, ValidationError> {
    key.round.ok_or_else(|| ValidationError::IncompleteKey {
        key: key.to_string(),
        part: "round",
    })
}

fn require_entity(key: &FetchKey) -> Result<&str, ValidationError> {
    key.entity
        .as_deref()
        .filter(|entity| !entity.trim().is_empty())
        .ok_or_else(|| ValidationError::IncompleteKey {
            key: key.to_string(),
            part: "entity id",
        })
}
