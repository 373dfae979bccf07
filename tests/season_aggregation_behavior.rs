//! Behavior-driven tests for season aggregation
//!
//! These tests verify HOW the season view reconciles the calendar, main
//! results and sprint results: upcoming suppression, schedule ordering,
//! sprint inclusion and request de-duplication.

mod support;

use std::sync::Arc;
use std::time::Duration;

use paddock_core::{
    aggregate_sprints, correlate, FixtureHttpClient, HttpError, Position, Round, RoundIndex,
    RoundState, Roster, SessionKind,
};
use time::macros::date;

use support::*;

fn norris() -> serde_json::Value {
    numbered_driver("norris", "Lando", "Norris", 4, "1999-11-13")
}

fn piastri() -> serde_json::Value {
    numbered_driver("piastri", "Oscar", "Piastri", 81, "2001-04-06")
}

fn mclaren() -> serde_json::Value {
    constructor("mclaren", "McLaren")
}

fn round(value: u32) -> Round {
    Round::new(value).expect("valid round")
}

// =============================================================================
// Season View: Upcoming Races
// =============================================================================

#[tokio::test]
async fn when_race_is_after_evaluation_date_system_suppresses_its_results() {
    // Given: Two races either side of the evaluation date, with result data
    // present for both (a postponed race with stale data)
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![race(1, "2025-03-02"), race(2, "2025-03-09")]),
            )
            .with_json("/2025/drivers/norris.json", drivers_body(vec![norris()]))
            .with_json(
                "/2025/drivers/norris/results.json",
                entity_results_body(vec![
                    (1, "2025-03-02", vec![result_row(norris(), mclaren(), "1", "25")]),
                    (2, "2025-03-09", vec![result_row(norris(), mclaren(), "2", "18")]),
                ]),
            )
            .with_json("/2025/1/sprint.json", no_session_body(1))
            .with_json(
                "/2025/2/sprint.json",
                session_body(2, "2025-03-09", vec![result_row(norris(), mclaren(), "1", "8")], true),
            ),
    );
    let view = view(client);

    // When: The driver view is built as of 2025-03-05
    let season = view
        .driver_view("norris", date!(2025 - 03 - 05))
        .await
        .expect("view should build");

    // Then: Round 1 is populated and round 2 carries no results at all
    assert_eq!(season.entries.len(), 2);

    let past = &season.entries[0];
    assert!(!past.is_upcoming);
    assert_eq!(past.main_state, RoundState::Classified);
    assert_eq!(
        past.main_result.as_ref().map(|row| row.position),
        Some(Position::Classified(1))
    );

    let upcoming = &season.entries[1];
    assert!(upcoming.is_upcoming);
    assert_eq!(upcoming.main_state, RoundState::Upcoming);
    assert!(upcoming.main_result.is_none());
    assert!(upcoming.sprint_result.is_none());
}

#[tokio::test]
async fn when_results_complete_out_of_order_system_keeps_schedule_order() {
    // Given: Three rounds whose sprint responses complete in reverse order
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![
                    race(1, "2025-03-02"),
                    race(2, "2025-03-09"),
                    race(3, "2025-03-16"),
                ]),
            )
            .with_json("/2025/drivers/norris.json", drivers_body(vec![norris()]))
            .with_json("/2025/drivers/norris/results.json", entity_results_body(vec![]))
            .with_json(
                "/2025/1/sprint.json",
                session_body(1, "2025-03-02", vec![result_row(norris(), mclaren(), "3", "6")], true),
            )
            .with_latency("/2025/1/sprint.json", Duration::from_millis(40))
            .with_json("/2025/2/sprint.json", no_session_body(2))
            .with_latency("/2025/2/sprint.json", Duration::from_millis(20))
            .with_json(
                "/2025/3/sprint.json",
                session_body(3, "2025-03-16", vec![result_row(norris(), mclaren(), "1", "8")], true),
            ),
    );
    let view = view(client);

    // When: The view is built after the season
    let season = view
        .driver_view("norris", date!(2025 - 12 - 31))
        .await
        .expect("view should build");

    // Then: Entries follow the calendar, and sprint rows land on their rounds
    let rounds: Vec<u32> = season.entries.iter().map(|e| e.race.round.get()).collect();
    assert_eq!(rounds, vec![1, 2, 3]);
    assert_eq!(
        season.entries[0].sprint_result.as_ref().map(|row| row.points),
        Some(6.0)
    );
    assert!(season.entries[1].sprint_result.is_none());
    assert_eq!(
        season.entries[2].sprint_result.as_ref().map(|row| row.points),
        Some(8.0)
    );
    // The driver's resolved results have no rows, so no round reads as loading
    assert!(season
        .entries
        .iter()
        .all(|entry| entry.main_state == RoundState::NotClassified));
}

// =============================================================================
// Sprint Fan-Out
// =============================================================================

#[tokio::test]
async fn when_sprint_rounds_vary_system_indexes_only_rounds_with_rows() {
    // Given: Round 1 held a sprint, round 2 fails, round 3 returns no rows
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![
                    race(1, "2025-03-02"),
                    race(2, "2025-03-09"),
                    race(3, "2025-03-16"),
                ]),
            )
            .with_json(
                "/2025/1/sprint.json",
                session_body(1, "2025-03-02", vec![result_row(piastri(), mclaren(), "1", "8")], true),
            )
            .with_error("/2025/2/sprint.json", HttpError::new("connection reset"))
            .with_json("/2025/3/sprint.json", no_session_body(3)),
    );
    let view = view(client);

    // When: The sprint index is aggregated
    let sprints = view.sprints().await.expect("schedule should load");

    // Then: Only round 1 is present
    let rounds: Vec<Round> = sprints.keys().copied().collect();
    assert_eq!(rounds, vec![round(1)]);
    assert_eq!(sprints[&round(1)].kind, SessionKind::Sprint);
    assert_eq!(sprints[&round(1)].len(), 1);
}

#[tokio::test]
async fn when_concurrency_is_one_system_still_awaits_every_round() {
    // Given: A fetcher and a schedule of four rounds, two with sprints
    let schedule_json = schedule_body(vec![
        race(1, "2025-03-02"),
        race(2, "2025-03-09"),
        race(3, "2025-03-16"),
        race(4, "2025-03-23"),
    ]);
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/2025/races.json", schedule_json)
            .with_json("/2025/1/sprint.json", no_session_body(1))
            .with_json(
                "/2025/2/sprint.json",
                session_body(2, "2025-03-09", vec![result_row(norris(), mclaren(), "2", "7")], true),
            )
            .with_json("/2025/3/sprint.json", no_session_body(3))
            .with_json(
                "/2025/4/sprint.json",
                session_body(4, "2025-03-23", vec![result_row(norris(), mclaren(), "1", "8")], true),
            )
            .with_latency("/2025/4/sprint.json", Duration::from_millis(30)),
    );
    let fetcher = fetcher(client.clone());
    let schedule = fetcher.schedule(season()).await.expect("schedule");

    // When: Sprints are aggregated one request at a time
    let sprints = aggregate_sprints(&fetcher, season(), &schedule, 1).await;

    // Then: The slow final round is included, not reported as absent
    let rounds: Vec<u32> = sprints.keys().map(|r| r.get()).collect();
    assert_eq!(rounds, vec![2, 4]);
    assert_eq!(client.requests().len(), 5);
}

// =============================================================================
// Request De-duplication
// =============================================================================

#[tokio::test]
async fn when_views_share_a_season_system_fetches_each_key_once() {
    // Given: Driver and constructor views that both need the schedule and the
    // sprint fan-out, with slow upstream responses
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![race(1, "2025-03-02"), race(2, "2025-03-09")]),
            )
            .with_latency("/2025/races.json", Duration::from_millis(30))
            .with_json("/2025/drivers/norris.json", drivers_body(vec![norris()]))
            .with_json("/2025/drivers/norris/results.json", entity_results_body(vec![]))
            .with_json("/2025/constructors.json", constructors_body(vec![mclaren()]))
            .with_json(
                "/2025/constructors/mclaren/drivers.json",
                drivers_body(vec![norris(), piastri()]),
            )
            .with_json(
                "/2025/constructors/mclaren/results.json",
                entity_results_body(vec![]),
            )
            .with_json("/2025/1/sprint.json", no_session_body(1))
            .with_latency("/2025/1/sprint.json", Duration::from_millis(20))
            .with_json("/2025/2/sprint.json", no_session_body(2)),
    );
    let view = view(client.clone());
    let as_of = date!(2025 - 12 - 31);

    // When: Both views are built concurrently, then the driver view again
    let (driver, constructor) = tokio::join!(
        view.driver_view("norris", as_of),
        view.constructor_view("mclaren", as_of),
    );
    driver.expect("driver view");
    constructor.expect("constructor view");
    view.driver_view("norris", as_of)
        .await
        .expect("repeat driver view");

    // Then: Every shared key went upstream exactly once
    assert_eq!(client.request_count("/2025/races.json"), 1);
    assert_eq!(client.request_count("/2025/1/sprint.json"), 1);
    assert_eq!(client.request_count("/2025/2/sprint.json"), 1);
    assert_eq!(client.request_count("/2025/drivers/norris/results.json"), 1);
}

// =============================================================================
// Constructor View and Race Detail
// =============================================================================

#[tokio::test]
async fn when_constructor_view_is_built_system_lists_each_driver_per_round() {
    // Given: A constructor with two drivers, one of whom retired in round 1
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/2025/races.json", schedule_body(vec![race(1, "2025-03-02")]))
            .with_json("/2025/constructors.json", constructors_body(vec![mclaren()]))
            .with_json(
                "/2025/constructors/mclaren/drivers.json",
                drivers_body(vec![norris(), piastri()]),
            )
            .with_json(
                "/2025/constructors/mclaren/results.json",
                entity_results_body(vec![(
                    1,
                    "2025-03-02",
                    vec![
                        result_row(norris(), mclaren(), "1", "25"),
                        result_row(piastri(), mclaren(), "R", "0"),
                    ],
                )]),
            )
            .with_json("/2025/1/sprint.json", no_session_body(1)),
    );
    let view = view(client);

    // When: The constructor view is built
    let season = view
        .constructor_view("mclaren", date!(2025 - 03 - 03))
        .await
        .expect("view should build");

    // Then: One entry per roster driver, in roster order
    let ids: Vec<&str> = season.entries.iter().map(|e| e.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["norris", "piastri"]);

    let retired = season.entries[1]
        .main_result
        .as_ref()
        .expect("piastri classified as retired");
    assert_eq!(retired.position, Position::Retired);
    assert_eq!(retired.position.label(), "DNF");
    assert_eq!(retired.time, None);
}

#[tokio::test]
async fn when_round_was_held_without_classification_system_reports_no_results() {
    // Given: Round 1 returns no classification, round 2 one without Norris
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![race(1, "2025-03-02"), race(2, "2025-03-09")]),
            )
            .with_json("/2025/1/results.json", no_session_body(1))
            .with_json(
                "/2025/2/results.json",
                session_body(2, "2025-03-09", vec![result_row(piastri(), mclaren(), "1", "25")], false),
            )
            .with_json("/2025/drivers/norris.json", drivers_body(vec![norris()])),
    );
    let fetcher = fetcher(client);
    let schedule = fetcher.schedule(season()).await.expect("schedule");
    let mut main = RoundIndex::new();
    for race in schedule.iter() {
        let set = fetcher
            .main_results(season(), race.round)
            .await
            .expect("main results");
        main.insert(race.round, set);
    }
    let norris = (*fetcher.driver(season(), "norris").await.expect("driver"))
        .clone()
        .expect("norris raced in 2025");

    // When: The per-round classifications are correlated for Norris
    let entries = correlate(
        &schedule,
        &main,
        &RoundIndex::new(),
        &Roster::Driver(norris),
        date!(2025 - 12 - 31),
    );

    // Then: The empty round says "no results", the other "not classified"
    let states: Vec<RoundState> = entries.iter().map(|entry| entry.main_state).collect();
    assert_eq!(states, vec![RoundState::NoResults, RoundState::NotClassified]);
    assert!(entries.iter().all(|entry| entry.main_result.is_none()));
}

#[tokio::test]
async fn when_race_detail_requested_system_returns_round_classification() {
    // Given: Main results for round 1
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/2025/races.json", schedule_body(vec![race(1, "2025-03-02")]))
            .with_json(
                "/2025/1/results.json",
                session_body(
                    1,
                    "2025-03-02",
                    vec![
                        result_row(norris(), mclaren(), "1", "25"),
                        result_row(piastri(), mclaren(), "2", "18"),
                    ],
                    false,
                ),
            ),
    );
    let view = view(client);

    // When: The round 1 main classification is requested
    let detail = view
        .race_detail(round(1), SessionKind::Main)
        .await
        .expect("detail should load");

    // Then: Rows keep classification order and the race is attached
    assert_eq!(detail.race.name, "Round 1 Grand Prix");
    assert_eq!(detail.kind, SessionKind::Main);
    let drivers: Vec<&str> = detail.rows.iter().map(|row| row.driver_id()).collect();
    assert_eq!(drivers, vec!["norris", "piastri"]);
    assert_eq!(detail.rows[1].time_or_status(), Some("+1.234"));
}

#[tokio::test]
async fn when_circuit_detail_requested_system_lists_rounds_held_there() {
    // Given: A calendar that visits circuit_1 twice
    let mut return_visit = race(3, "2025-03-16");
    return_visit["Circuit"] = circuit("circuit_1");
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/2025/races.json",
                schedule_body(vec![race(1, "2025-03-02"), race(2, "2025-03-09"), return_visit]),
            )
            .with_json("/2025/circuits/circuit_1.json", circuits_body(vec![circuit("circuit_1")])),
    );
    let view = view(client.clone());

    // When: The circuit detail is requested twice
    let detail = view.circuit("circuit_1").await.expect("circuit should load");
    view.circuit("circuit_1").await.expect("cached circuit");

    // Then: Both visits are listed in calendar order from one lookup
    let rounds: Vec<u32> = detail.races.iter().map(|race| race.round.get()).collect();
    assert_eq!(rounds, vec![1, 3]);
    assert_eq!(detail.circuit.location.locality, "circuit_1");
    assert_eq!(client.request_count("/2025/circuits/circuit_1.json"), 1);
}
