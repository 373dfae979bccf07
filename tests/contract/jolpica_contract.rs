//! Contract tests for the Jolpica adapter: endpoint paths, envelope decoding
//! and normalization of string-encoded fields.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use paddock_core::{
    DataSource, EntityRef, FetchFailureKind, FixtureHttpClient, JolpicaAdapter, Position, Round,
    SessionKind, StandingEntity,
};
use serde_json::json;
use time::macros::{date, time};

use support::*;

fn adapter(client: Arc<FixtureHttpClient>) -> JolpicaAdapter {
    JolpicaAdapter::with_http_client(client, config())
}

fn round(value: u32) -> Round {
    Round::new(value).expect("valid round")
}

#[tokio::test]
async fn schedule_decodes_dates_times_and_coordinates() {
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/races.json",
        schedule_body(vec![race(1, "2025-03-16"), race(2, "2025-03-23")]),
    ));

    let races = adapter(client).schedule(season()).await.expect("schedule");

    assert_eq!(races.len(), 2);
    let opener = &races[0];
    assert_eq!(opener.round, round(1));
    assert_eq!(opener.date, date!(2025 - 03 - 16));
    assert_eq!(opener.time, Some(time!(14:00:00)));
    assert_eq!(opener.circuit.id, "circuit_1");
    assert_eq!(opener.circuit.location.lat, Some(26.03));
    assert!(opener.circuit.url.is_some());
}

#[tokio::test]
async fn race_without_time_keeps_time_absent() {
    let mut untimed = race(1, "1950-05-13");
    untimed.as_object_mut().expect("object").remove("time");
    let client = Arc::new(
        FixtureHttpClient::new().with_json("/2025/races.json", schedule_body(vec![untimed])),
    );

    let races = adapter(client).schedule(season()).await.expect("schedule");

    assert_eq!(races[0].time, None);
}

#[tokio::test]
async fn drivers_keep_missing_optional_fields_absent() {
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/drivers.json",
        drivers_body(vec![
            numbered_driver("albon", "Alexander", "Albon", 23, "1996-03-23"),
            driver("doohan", "Jack", "Doohan"),
        ]),
    ));

    let drivers = adapter(client).drivers(season()).await.expect("drivers");

    assert_eq!(drivers[0].permanent_number, Some(23));
    assert_eq!(drivers[0].code.as_deref(), Some("ALB"));
    assert_eq!(drivers[0].date_of_birth, Some(date!(1996 - 03 - 23)));
    assert_eq!(drivers[1].permanent_number, None);
    assert_eq!(drivers[1].code, None);
    assert_eq!(drivers[1].date_of_birth, None);
    assert_eq!(drivers[1].full_name(), "Jack Doohan");
}

#[tokio::test]
async fn catalog_tables_decode() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/constructors.json",
                constructors_body(vec![constructor("williams", "Williams")]),
            )
            .with_json("/2025/circuits.json", circuits_body(vec![circuit("monza")])),
    );
    let adapter = adapter(client);

    let constructors = adapter.constructors(season()).await.expect("constructors");
    let circuits = adapter.circuits(season()).await.expect("circuits");

    assert_eq!(constructors[0].name, "Williams");
    assert_eq!(constructors[0].nationality.as_deref(), Some("British"));
    assert_eq!(circuits[0].location.locality, "monza");
}

#[tokio::test]
async fn absent_or_blank_free_text_stays_absent() {
    let mut rookie = driver("lindblad", "Arvid", "Lindblad");
    rookie.as_object_mut().expect("object").remove("nationality");
    let mut team = constructor("racing_bulls", "Racing Bulls");
    team["nationality"] = json!("  ");
    let mut row = result_row(rookie, team, "R", "0");
    row.as_object_mut().expect("object").remove("status");
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/4/results.json",
        session_body(4, "2025-04-13", vec![row], false),
    ));

    let set = adapter(client)
        .session_results(season(), round(4), SessionKind::Main)
        .await
        .expect("results");

    let row = &set.rows[0];
    assert_eq!(row.driver.nationality, None);
    assert_eq!(row.constructor.nationality, None);
    assert_eq!(row.status, None);
    assert_eq!(row.time_or_status(), None);
}

#[tokio::test]
async fn circuit_lookup_is_season_scoped_and_optional() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/2025/circuits/monza.json", circuits_body(vec![circuit("monza")]))
            .with_json("/2025/circuits/yas%20marina.json", circuits_body(vec![])),
    );
    let adapter = adapter(client.clone());

    let monza = adapter.circuit(season(), "monza").await.expect("monza");
    let absent = adapter
        .circuit(season(), "yas marina")
        .await
        .expect("an empty table is not an error");

    assert_eq!(monza.map(|circuit| circuit.id), Some(String::from("monza")));
    assert!(absent.is_none());
    assert_eq!(
        client.requests()[1],
        format!("{BASE_URL}/2025/circuits/yas%20marina.json?limit=100")
    );
}

#[tokio::test]
async fn standings_decode_for_drivers_and_constructors() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/driverstandings.json",
                driver_standings_body(vec![(
                    driver("piastri", "Oscar", "Piastri"),
                    constructor("mclaren", "McLaren"),
                    "131",
                )]),
            )
            .with_json(
                "/2025/constructorstandings.json",
                constructor_standings_body(vec![(constructor("mclaren", "McLaren"), "246")]),
            ),
    );
    let adapter = adapter(client);

    let drivers = adapter.driver_standings(season()).await.expect("drivers");
    let constructors = adapter
        .constructor_standings(season())
        .await
        .expect("constructors");

    assert_eq!(drivers[0].position, Some(1));
    assert_eq!(drivers[0].points, "131");
    match &drivers[0].entity {
        StandingEntity::Driver {
            driver,
            constructors,
        } => {
            assert_eq!(driver.id, "piastri");
            assert_eq!(constructors[0].id, "mclaren");
        }
        other => panic!("expected a driver entity, got {other:?}"),
    }
    assert_eq!(constructors[0].wins, 1);
    assert_eq!(constructors[0].entity.id(), "mclaren");
}

#[tokio::test]
async fn season_without_standings_yields_empty_table() {
    let body = json!({ "MRData": { "StandingsTable": { "season": "2026", "StandingsLists": [] } } });
    let client = Arc::new(
        FixtureHttpClient::new().with_json("/2025/driverstandings.json", body.to_string()),
    );

    let standings = adapter(client)
        .driver_standings(season())
        .await
        .expect("empty standings are not an error");

    assert!(standings.is_empty());
}

#[tokio::test]
async fn position_markers_decode_to_non_finish_kinds() {
    let team = constructor("haas", "Haas F1 Team");
    let rows = ["R", "D", "E", "W", "F", "N"]
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let id = format!("driver_{index}");
            result_row(driver(&id, "Given", &id), team.clone(), marker, "0")
        })
        .collect();
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/5/results.json",
        session_body(5, "2025-04-20", rows, false),
    ));

    let set = adapter(client)
        .session_results(season(), round(5), SessionKind::Main)
        .await
        .expect("results");

    let positions: Vec<Position> = set.rows.iter().map(|row| row.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::Retired,
            Position::Disqualified,
            Position::Excluded,
            Position::Withdrawn,
            Position::FailedToQualify,
            Position::NotClassified,
        ]
    );
    assert!(set.rows.iter().all(|row| row.time.is_none()));
}

#[tokio::test]
async fn entity_results_are_indexed_by_round() {
    let me = driver("sainz", "Carlos", "Sainz");
    let team = constructor("williams", "Williams");
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/drivers/sainz/results.json",
        entity_results_body(vec![
            (1, "2025-03-16", vec![result_row(me.clone(), team.clone(), "R", "0")]),
            (3, "2025-04-06", vec![result_row(me, team, "14", "0")]),
        ]),
    ));

    let index = adapter(client)
        .entity_results(season(), &EntityRef::Driver(String::from("sainz")))
        .await
        .expect("results");

    let rounds: Vec<u32> = index.keys().map(|r| r.get()).collect();
    assert_eq!(rounds, vec![1, 3]);
    assert_eq!(index[&round(3)].kind, SessionKind::Main);
    assert_eq!(index[&round(3)].rows[0].position, Position::Classified(14));
}

#[tokio::test]
async fn requests_use_page_limit_and_escape_identifiers() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/drivers.json", drivers_body(vec![]))
            .with_json("/results.json", entity_results_body(vec![])),
    );
    let adapter = adapter(client.clone());

    adapter
        .constructor_drivers(season(), "red bull")
        .await
        .expect("roster");
    adapter
        .entity_results(season(), &EntityRef::Constructor(String::from("red bull")))
        .await
        .expect("results");

    assert_eq!(
        client.requests(),
        vec![
            format!("{BASE_URL}/2025/constructors/red%20bull/drivers.json?limit=100"),
            format!("{BASE_URL}/2025/constructors/red%20bull/results.json?limit=100"),
        ]
    );
}

#[tokio::test]
async fn response_without_expected_table_is_a_decode_failure() {
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/2025/drivers.json",
        schedule_body(vec![race(1, "2025-03-16")]),
    ));

    let failure = adapter(client)
        .drivers(season())
        .await
        .expect_err("a race table is not a driver table");

    assert_eq!(failure.kind(), FetchFailureKind::Decode);
    assert!(failure.message().contains("DriverTable"));
}

#[tokio::test]
async fn unknown_route_is_a_status_failure() {
    let client = Arc::new(FixtureHttpClient::new());

    let failure = adapter(client)
        .session_results(season(), round(2), SessionKind::Sprint)
        .await
        .expect_err("404");

    assert_eq!(failure.kind(), FetchFailureKind::Status(404));
    assert_eq!(failure.key().round, Some(round(2)));
}
