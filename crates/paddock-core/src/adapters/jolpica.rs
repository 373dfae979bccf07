use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::FetchConfig;
use crate::data_source::{
    DataSource, EntityRef, FetchFailure, FetchKey, RoundIndex, SourceFuture,
};
use crate::domain::calendar::{parse_date, parse_time};
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::{
    Circuit, Constructor, Driver, Location, Position, Race, ResultRow, Round, Season,
    SessionKind, SessionResultSet, StandingEntity, StandingEntry, ValidationError,
};

/// Page size large enough for a full grid or a full calendar in one request.
const PAGE_LIMIT: u32 = 100;

/// Adapter for the Ergast-compatible Jolpica API.
#[derive(Clone)]
pub struct JolpicaAdapter {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl Default for JolpicaAdapter {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl JolpicaAdapter {
    pub fn new(config: FetchConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}?limit={PAGE_LIMIT}", self.config.api_root())
    }

    async fn get_json<T>(&self, key: &FetchKey, path: &str) -> Result<T, FetchFailure>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(key = %key, url = %url, "requesting upstream");

        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| transport_failure(key, &error, self.config.timeout_ms))?;

        if !response.is_success() {
            return Err(FetchFailure::status(key.clone(), response.status));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            FetchFailure::decode(key.clone(), format!("failed to parse response: {e}"))
        })
    }
}

impl DataSource for JolpicaAdapter {
    fn schedule<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Race>> {
        Box::pin(async move {
            let key = FetchKey::schedule(season);
            let envelope: WireEnvelope = self.get_json(&key, &format!("{season}/races.json")).await?;

            envelope
                .race_table(&key)?
                .races
                .into_iter()
                .map(normalize_race)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| integrity_failure(&key, error))
        })
    }

    fn session_results<'a>(
        &'a self,
        season: Season,
        round: Round,
        kind: SessionKind,
    ) -> SourceFuture<'a, SessionResultSet> {
        Box::pin(async move {
            let key = FetchKey::session(season, round, kind);
            let resource = match kind {
                SessionKind::Main => "results",
                SessionKind::Sprint => "sprint",
            };
            let envelope: WireEnvelope = self
                .get_json(&key, &format!("{season}/{round}/{resource}.json"))
                .await?;

            let Some(race) = envelope.race_table(&key)?.races.into_iter().next() else {
                return Ok(SessionResultSet::empty(season, round, kind));
            };

            let rows = match kind {
                SessionKind::Main => race.results,
                SessionKind::Sprint => race.sprint_results,
            };

            let rows = rows
                .into_iter()
                .map(normalize_result_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| integrity_failure(&key, error))?;

            Ok(SessionResultSet::new(season, round, kind, rows))
        })
    }

    fn driver_standings<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<StandingEntry>> {
        Box::pin(async move {
            let key = FetchKey::driver_standings(season);
            let envelope: WireEnvelope = self
                .get_json(&key, &format!("{season}/driverstandings.json"))
                .await?;

            let Some(list) = envelope.standings_table(&key)?.standings_lists.into_iter().next()
            else {
                return Ok(Vec::new());
            };

            list.driver_standings
                .into_iter()
                .map(|standing| {
                    let driver = normalize_driver(standing.driver)?;
                    let constructors = standing
                        .constructors
                        .into_iter()
                        .map(normalize_constructor)
                        .collect();
                    Ok(normalize_standing(
                        standing.position,
                        standing.position_text,
                        standing.points,
                        standing.wins,
                        StandingEntity::Driver {
                            driver,
                            constructors,
                        },
                    ))
                })
                .collect::<Result<Vec<_>, ValidationError>>()
                .map_err(|error| integrity_failure(&key, error))
        })
    }

    fn constructor_standings<'a>(
        &'a self,
        season: Season,
    ) -> SourceFuture<'a, Vec<StandingEntry>> {
        Box::pin(async move {
            let key = FetchKey::constructor_standings(season);
            let envelope: WireEnvelope = self
                .get_json(&key, &format!("{season}/constructorstandings.json"))
                .await?;

            let Some(list) = envelope.standings_table(&key)?.standings_lists.into_iter().next()
            else {
                return Ok(Vec::new());
            };

            Ok(list
                .constructor_standings
                .into_iter()
                .map(|standing| {
                    normalize_standing(
                        standing.position,
                        standing.position_text,
                        standing.points,
                        standing.wins,
                        StandingEntity::Constructor {
                            constructor: normalize_constructor(standing.constructor),
                        },
                    )
                })
                .collect())
        })
    }

    fn drivers<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Driver>> {
        Box::pin(async move {
            let key = FetchKey::drivers(season);
            let envelope: WireEnvelope =
                self.get_json(&key, &format!("{season}/drivers.json")).await?;
            decode_drivers(&key, envelope)
        })
    }

    fn constructors<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Constructor>> {
        Box::pin(async move {
            let key = FetchKey::constructors(season);
            let envelope: WireEnvelope = self
                .get_json(&key, &format!("{season}/constructors.json"))
                .await?;

            let table = envelope
                .mr_data
                .constructor_table
                .ok_or_else(|| missing_table(&key, "ConstructorTable"))?;
            Ok(table
                .constructors
                .into_iter()
                .map(normalize_constructor)
                .collect())
        })
    }

    fn circuits<'a>(&'a self, season: Season) -> SourceFuture<'a, Vec<Circuit>> {
        Box::pin(async move {
            let key = FetchKey::circuits(season);
            let envelope: WireEnvelope =
                self.get_json(&key, &format!("{season}/circuits.json")).await?;

            let table = envelope
                .mr_data
                .circuit_table
                .ok_or_else(|| missing_table(&key, "CircuitTable"))?;
            Ok(table.circuits.into_iter().map(normalize_circuit).collect())
        })
    }

    fn circuit<'a>(
        &'a self,
        season: Season,
        circuit_id: &'a str,
    ) -> SourceFuture<'a, Option<Circuit>> {
        Box::pin(async move {
            let key = FetchKey::circuit(season, circuit_id);
            let path = format!("{season}/circuits/{}.json", urlencoding::encode(circuit_id));
            let envelope: WireEnvelope = self.get_json(&key, &path).await?;

            let table = envelope
                .mr_data
                .circuit_table
                .ok_or_else(|| missing_table(&key, "CircuitTable"))?;
            Ok(table.circuits.into_iter().next().map(normalize_circuit))
        })
    }

    fn driver<'a>(
        &'a self,
        season: Season,
        driver_id: &'a str,
    ) -> SourceFuture<'a, Option<Driver>> {
        Box::pin(async move {
            let key = FetchKey::driver(season, driver_id);
            let path = format!("{season}/drivers/{}.json", urlencoding::encode(driver_id));
            let envelope: WireEnvelope = self.get_json(&key, &path).await?;
            Ok(decode_drivers(&key, envelope)?.into_iter().next())
        })
    }

    fn constructor_drivers<'a>(
        &'a self,
        season: Season,
        constructor_id: &'a str,
    ) -> SourceFuture<'a, Vec<Driver>> {
        Box::pin(async move {
            let key = FetchKey::constructor_drivers(season, constructor_id);
            let path = format!(
                "{season}/constructors/{}/drivers.json",
                urlencoding::encode(constructor_id)
            );
            let envelope: WireEnvelope = self.get_json(&key, &path).await?;
            decode_drivers(&key, envelope)
        })
    }

    fn entity_results<'a>(
        &'a self,
        season: Season,
        entity: &'a EntityRef,
    ) -> SourceFuture<'a, RoundIndex> {
        Box::pin(async move {
            let key = FetchKey::entity_results(season, entity);
            let collection = match entity {
                EntityRef::Driver(_) => "drivers",
                EntityRef::Constructor(_) => "constructors",
            };
            let path = format!(
                "{season}/{collection}/{}/results.json",
                urlencoding::encode(entity.id())
            );
            let envelope: WireEnvelope = self.get_json(&key, &path).await?;

            let mut index = RoundIndex::new();
            for race in envelope.race_table(&key)?.races {
                let round = Round::parse(&race.round).map_err(|e| integrity_failure(&key, e))?;
                let rows = race
                    .results
                    .into_iter()
                    .map(normalize_result_row)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| integrity_failure(&key, e))?;
                index.insert(
                    round,
                    Arc::new(SessionResultSet::new(season, round, SessionKind::Main, rows)),
                );
            }
            Ok(index)
        })
    }
}

fn transport_failure(key: &FetchKey, error: &HttpError, timeout_ms: u64) -> FetchFailure {
    if error.timed_out() {
        FetchFailure::timeout(key.clone(), timeout_ms)
    } else {
        FetchFailure::transport(key.clone(), error.message())
    }
}

fn integrity_failure(key: &FetchKey, error: ValidationError) -> FetchFailure {
    FetchFailure::decode(key.clone(), error.to_string())
}

fn missing_table(key: &FetchKey, table: &str) -> FetchFailure {
    FetchFailure::decode(key.clone(), format!("response has no {table}"))
}

fn decode_drivers(key: &FetchKey, envelope: WireEnvelope) -> Result<Vec<Driver>, FetchFailure> {
    let table = envelope
        .mr_data
        .driver_table
        .ok_or_else(|| missing_table(key, "DriverTable"))?;

    table
        .drivers
        .into_iter()
        .map(normalize_driver)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| integrity_failure(key, error))
}

fn parse_count(value: Option<&str>) -> Option<u32> {
    value.and_then(|raw| raw.trim().parse().ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value.and_then(|raw| raw.trim().parse().ok())
}

fn normalize_race(wire: WireRace) -> Result<Race, ValidationError> {
    Ok(Race {
        season: Season::parse(&wire.season)?,
        round: Round::parse(&wire.round)?,
        name: wire.race_name,
        date: parse_date(&wire.date)?,
        time: wire.time.as_deref().map(parse_time).transpose()?,
        circuit: normalize_circuit(wire.circuit),
    })
}

fn normalize_circuit(wire: WireCircuit) -> Circuit {
    Circuit {
        id: wire.circuit_id,
        name: wire.circuit_name,
        location: Location {
            locality: wire.location.locality,
            country: wire.location.country,
            lat: parse_coordinate(wire.location.lat.as_deref()),
            long: parse_coordinate(wire.location.long.as_deref()),
        },
        url: wire.url,
    }
}

fn normalize_driver(wire: WireDriver) -> Result<Driver, ValidationError> {
    Ok(Driver {
        id: wire.driver_id,
        given_name: wire.given_name,
        family_name: wire.family_name,
        permanent_number: parse_count(wire.permanent_number.as_deref()),
        code: wire.code,
        date_of_birth: wire.date_of_birth.as_deref().map(parse_date).transpose()?,
        nationality: non_blank(wire.nationality),
        url: wire.url,
    })
}

fn normalize_constructor(wire: WireConstructor) -> Constructor {
    Constructor {
        id: wire.constructor_id,
        name: wire.name,
        nationality: non_blank(wire.nationality),
        url: wire.url,
    }
}

fn normalize_result_row(wire: WireResult) -> Result<ResultRow, ValidationError> {
    let points = wire
        .points
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|points| points.is_finite() && *points >= 0.0)
        .ok_or_else(|| ValidationError::InvalidPoints {
            index: parse_count(wire.position.as_deref()).unwrap_or(0) as usize,
            value: wire.points.clone(),
        })?;

    let position_text = wire
        .position_text
        .as_deref()
        .or(wire.position.as_deref())
        .unwrap_or_default();

    Ok(ResultRow {
        number: parse_count(wire.number.as_deref()),
        position: Position::from_position_text(position_text),
        order: parse_count(wire.position.as_deref()),
        points,
        grid: parse_count(wire.grid.as_deref()),
        laps: parse_count(wire.laps.as_deref()),
        status: non_blank(wire.status),
        time: wire.time.map(|time| time.time),
        driver: normalize_driver(wire.driver)?,
        constructor: normalize_constructor(wire.constructor),
    })
}

fn normalize_standing(
    position: Option<String>,
    position_text: Option<String>,
    points: String,
    wins: Option<String>,
    entity: StandingEntity,
) -> StandingEntry {
    let position = parse_count(position.as_deref());
    StandingEntry {
        position,
        position_text: position_text
            .or_else(|| position.map(|value| value.to_string()))
            .unwrap_or_else(|| String::from("-")),
        points,
        wins: parse_count(wins.as_deref()).unwrap_or(0),
        entity,
    }
}

// Jolpica / Ergast response structures
#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(rename = "MRData")]
    mr_data: WireMrData,
}

impl WireEnvelope {
    fn race_table(self, key: &FetchKey) -> Result<WireRaceTable, FetchFailure> {
        self.mr_data
            .race_table
            .ok_or_else(|| missing_table(key, "RaceTable"))
    }

    fn standings_table(self, key: &FetchKey) -> Result<WireStandingsTable, FetchFailure> {
        self.mr_data
            .standings_table
            .ok_or_else(|| missing_table(key, "StandingsTable"))
    }
}

#[derive(Debug, Deserialize)]
struct WireMrData {
    #[serde(rename = "RaceTable", default)]
    race_table: Option<WireRaceTable>,
    #[serde(rename = "StandingsTable", default)]
    standings_table: Option<WireStandingsTable>,
    #[serde(rename = "DriverTable", default)]
    driver_table: Option<WireDriverTable>,
    #[serde(rename = "ConstructorTable", default)]
    constructor_table: Option<WireConstructorTable>,
    #[serde(rename = "CircuitTable", default)]
    circuit_table: Option<WireCircuitTable>,
}

#[derive(Debug, Deserialize)]
struct WireRaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<WireRace>,
}

#[derive(Debug, Deserialize)]
struct WireRace {
    season: String,
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    #[serde(rename = "Circuit")]
    circuit: WireCircuit,
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(rename = "Results", default)]
    results: Vec<WireResult>,
    #[serde(rename = "SprintResults", default)]
    sprint_results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
struct WireCircuit {
    #[serde(rename = "circuitId")]
    circuit_id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "circuitName")]
    circuit_name: String,
    #[serde(rename = "Location")]
    location: WireLocation,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    long: Option<String>,
    locality: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WireDriver {
    #[serde(rename = "driverId")]
    driver_id: String,
    #[serde(rename = "permanentNumber", default)]
    permanent_number: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
    #[serde(rename = "dateOfBirth", default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    nationality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireConstructor {
    #[serde(rename = "constructorId")]
    constructor_id: String,
    #[serde(default)]
    url: Option<String>,
    name: String,
    #[serde(default)]
    nationality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(rename = "positionText", default)]
    position_text: Option<String>,
    points: String,
    #[serde(rename = "Driver")]
    driver: WireDriver,
    #[serde(rename = "Constructor")]
    constructor: WireConstructor,
    #[serde(default)]
    grid: Option<String>,
    #[serde(default)]
    laps: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "Time", default)]
    time: Option<WireTime>,
}

#[derive(Debug, Deserialize)]
struct WireTime {
    time: String,
}

#[derive(Debug, Deserialize)]
struct WireStandingsTable {
    #[serde(rename = "StandingsLists", default)]
    standings_lists: Vec<WireStandingsList>,
}

#[derive(Debug, Deserialize)]
struct WireStandingsList {
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<WireDriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    constructor_standings: Vec<WireConstructorStanding>,
}

#[derive(Debug, Deserialize)]
struct WireDriverStanding {
    #[serde(default)]
    position: Option<String>,
    #[serde(rename = "positionText", default)]
    position_text: Option<String>,
    points: String,
    #[serde(default)]
    wins: Option<String>,
    #[serde(rename = "Driver")]
    driver: WireDriver,
    #[serde(rename = "Constructors", default)]
    constructors: Vec<WireConstructor>,
}

#[derive(Debug, Deserialize)]
struct WireConstructorStanding {
    #[serde(default)]
    position: Option<String>,
    #[serde(rename = "positionText", default)]
    position_text: Option<String>,
    points: String,
    #[serde(default)]
    wins: Option<String>,
    #[serde(rename = "Constructor")]
    constructor: WireConstructor,
}

#[derive(Debug, Deserialize)]
struct WireDriverTable {
    #[serde(rename = "Drivers", default)]
    drivers: Vec<WireDriver>,
}

#[derive(Debug, Deserialize)]
struct WireConstructorTable {
    #[serde(rename = "Constructors", default)]
    constructors: Vec<WireConstructor>,
}

#[derive(Debug, Deserialize)]
struct WireCircuitTable {
    #[serde(rename = "Circuits", default)]
    circuits: Vec<WireCircuit>,
}
