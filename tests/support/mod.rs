//! Shared fixtures for integration tests.
//!
//! Bodies mirror the Jolpica `MRData` envelope with string-encoded numbers.

#![allow(dead_code)]

use std::sync::Arc;

use paddock_core::{
    FetchConfig, FixtureHttpClient, JolpicaAdapter, ResultFetcher, Season, SeasonView,
};
use serde_json::{json, Value};

pub const BASE_URL: &str = "https://api.test/ergast/f1";

pub fn season() -> Season {
    Season::parse("2025").expect("valid season")
}

/// Unpaced config pointed at the fixture host.
pub fn config() -> FetchConfig {
    FetchConfig::default()
        .with_base_url(BASE_URL)
        .with_rate(0, 0)
        .with_timeout_ms(1_000)
}

pub fn view(client: Arc<FixtureHttpClient>) -> SeasonView {
    view_with(client, config())
}

pub fn view_with(client: Arc<FixtureHttpClient>, config: FetchConfig) -> SeasonView {
    let adapter = JolpicaAdapter::with_http_client(client, config.clone());
    SeasonView::new(Arc::new(adapter), season(), &config)
}

pub fn fetcher(client: Arc<FixtureHttpClient>) -> ResultFetcher {
    let config = config();
    let adapter = JolpicaAdapter::with_http_client(client, config.clone());
    ResultFetcher::new(Arc::new(adapter), &config)
}

pub fn circuit(id: &str) -> Value {
    json!({
        "circuitId": id,
        "url": format!("https://en.wikipedia.org/wiki/{id}"),
        "circuitName": format!("{id} circuit"),
        "Location": { "lat": "26.03", "long": "50.51", "locality": id, "country": "Country" }
    })
}

pub fn race(round: u32, date: &str) -> Value {
    json!({
        "season": "2025",
        "round": round.to_string(),
        "raceName": format!("Round {round} Grand Prix"),
        "Circuit": circuit(&format!("circuit_{round}")),
        "date": date,
        "time": "14:00:00Z"
    })
}

pub fn driver(id: &str, given: &str, family: &str) -> Value {
    json!({
        "driverId": id,
        "givenName": given,
        "familyName": family,
        "nationality": "Unknown"
    })
}

pub fn numbered_driver(id: &str, given: &str, family: &str, number: u32, born: &str) -> Value {
    let mut value = driver(id, given, family);
    value["permanentNumber"] = json!(number.to_string());
    value["code"] = json!(family.chars().take(3).collect::<String>().to_uppercase());
    value["dateOfBirth"] = json!(born);
    value
}

pub fn constructor(id: &str, name: &str) -> Value {
    json!({ "constructorId": id, "name": name, "nationality": "British" })
}

pub fn result_row(driver: Value, constructor: Value, position: &str, points: &str) -> Value {
    let finished = position.parse::<u32>().is_ok();
    let mut row = json!({
        "number": "0",
        "position": if finished { position.to_owned() } else { String::from("20") },
        "positionText": position,
        "points": points,
        "grid": "1",
        "laps": if finished { "57" } else { "12" },
        "status": if finished { "Finished" } else { "Retired" },
        "Driver": driver,
        "Constructor": constructor
    });
    if finished {
        row["Time"] = json!({ "millis": "5000000", "time": "+1.234" });
    }
    row
}

fn envelope(table: &str, body: Value) -> String {
    let mut mr_data = json!({ "xmlns": "", "series": "f1", "limit": "100", "offset": "0" });
    mr_data[table] = body;
    json!({ "MRData": mr_data }).to_string()
}

pub fn schedule_body(races: Vec<Value>) -> String {
    envelope("RaceTable", json!({ "season": "2025", "Races": races }))
}

pub fn session_body(round: u32, date: &str, rows: Vec<Value>, sprint: bool) -> String {
    let mut race = race(round, date);
    race[if sprint { "SprintResults" } else { "Results" }] = Value::Array(rows);
    envelope("RaceTable", json!({ "season": "2025", "round": round.to_string(), "Races": [race] }))
}

pub fn no_session_body(round: u32) -> String {
    envelope("RaceTable", json!({ "season": "2025", "round": round.to_string(), "Races": [] }))
}

/// Season results of one entity: one race object per round it took part in.
pub fn entity_results_body(rounds: Vec<(u32, &str, Vec<Value>)>) -> String {
    let races: Vec<Value> = rounds
        .into_iter()
        .map(|(round, date, rows)| {
            let mut race = race(round, date);
            race["Results"] = Value::Array(rows);
            race
        })
        .collect();
    envelope("RaceTable", json!({ "season": "2025", "Races": races }))
}

pub fn drivers_body(drivers: Vec<Value>) -> String {
    envelope("DriverTable", json!({ "season": "2025", "Drivers": drivers }))
}

pub fn constructors_body(constructors: Vec<Value>) -> String {
    envelope("ConstructorTable", json!({ "season": "2025", "Constructors": constructors }))
}

pub fn circuits_body(circuits: Vec<Value>) -> String {
    envelope("CircuitTable", json!({ "season": "2025", "Circuits": circuits }))
}

pub fn driver_standings_body(entries: Vec<(Value, Value, &str)>) -> String {
    let standings: Vec<Value> = entries
        .into_iter()
        .enumerate()
        .map(|(index, (driver, constructor, points))| {
            json!({
                "position": (index + 1).to_string(),
                "positionText": (index + 1).to_string(),
                "points": points,
                "wins": "0",
                "Driver": driver,
                "Constructors": [constructor]
            })
        })
        .collect();
    envelope(
        "StandingsTable",
        json!({ "season": "2025", "StandingsLists": [{ "season": "2025", "round": "10", "DriverStandings": standings }] }),
    )
}

pub fn constructor_standings_body(entries: Vec<(Value, &str)>) -> String {
    let standings: Vec<Value> = entries
        .into_iter()
        .enumerate()
        .map(|(index, (constructor, points))| {
            json!({
                "position": (index + 1).to_string(),
                "positionText": (index + 1).to_string(),
                "points": points,
                "wins": "1",
                "Constructor": constructor
            })
        })
        .collect();
    envelope(
        "StandingsTable",
        json!({ "season": "2025", "StandingsLists": [{ "season": "2025", "round": "10", "ConstructorStandings": standings }] }),
    )
}
