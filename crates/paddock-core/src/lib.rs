//! # Paddock Core
//!
//! Season results aggregation for Formula 1 data served by the
//! Ergast-compatible Jolpica API.
//!
//! ## Overview
//!
//! This crate reconciles three independently fetched sources (the season
//! calendar, per-round main results and per-round sprint results) into one
//! per-driver or per-constructor season view:
//!
//! - **Domain models** for races, drivers, constructors, circuits, result rows
//!   and standings
//! - **Data source trait** with a Jolpica adapter over a pluggable HTTP client
//! - **Request-scoped fetcher** that de-duplicates concurrent requests per key
//! - **Sprint fan-out** over a schedule with bounded concurrency
//! - **Correlator** joining schedule, main and sprint results by round
//! - **Standings gaps** and **driver sorting**
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Jolpica provider adapter |
//! | [`aggregate`] | Sprint fan-out across a schedule |
//! | [`cache`] | Per-key in-flight de-duplication |
//! | [`config`] | Fetch configuration and environment overrides |
//! | [`correlate`] | Schedule/result correlation per entity |
//! | [`data_source`] | Data source trait, request keys and fetch failures |
//! | [`domain`] | Domain models (Race, Driver, ResultRow, StandingEntry) |
//! | [`error`] | Core error types |
//! | [`fetcher`] | Request-scoped result fetcher |
//! | [`http_client`] | HTTP client abstraction |
//! | [`pacing`] | Upstream request rate limiting |
//! | [`sort`] | Driver roster ordering |
//! | [`standings`] | Points gaps for standings tables |
//! | [`view`] | Season views built from one fetcher |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paddock_core::{FetchConfig, Season, SeasonView};
//! use time::macros::date;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let view = SeasonView::from_config(Season::parse("2025")?, FetchConfig::from_env());
//!
//!     let season = view.driver_view("norris", date!(2025 - 06 - 01)).await?;
//!     for entry in &season.entries {
//!         println!("{} {:?}", entry.race.name, entry.main_state);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        SeasonView                          │
//! ├────────────────────────────────────────────────────────────┤
//! │  correlate()  aggregate_sprints()  with_gaps()  sort()     │
//! ├────────────────────────────────────────────────────────────┤
//! │          ResultFetcher (RequestCache + RequestPacer)       │
//! ├────────────────────────────────────────────────────────────┤
//! │                  DataSource: JolpicaAdapter                │
//! ├────────────────────────────────────────────────────────────┤
//! │          HttpClient: ReqwestHttpClient | Fixture           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`CoreError`], which wraps:
//!
//! - [`ValidationError`] - malformed input or inconsistent payloads
//! - [`FetchFailure`] - transport, timeout, status or decode failure for one
//!   request key
//!
//! ```rust,ignore
//! use paddock_core::{CoreError, FetchFailureKind};
//!
//! match view.race_detail(round, SessionKind::Main).await {
//!     Ok(detail) => println!("{} rows", detail.rows.len()),
//!     Err(CoreError::Fetch(failure)) if failure.kind() == FetchFailureKind::Timeout => {
//!         eprintln!("{} timed out", failure.key());
//!     }
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! ```

pub mod adapters;
pub mod aggregate;
pub mod cache;
pub mod config;
pub mod correlate;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod pacing;
pub mod sort;
pub mod standings;
pub mod view;

pub use adapters::JolpicaAdapter;
pub use aggregate::aggregate_sprints;
pub use cache::RequestCache;
pub use config::{FetchConfig, DEFAULT_BASE_URL};
pub use correlate::{correlate, CorrelatedRaceEntry, RoundState, Roster};
pub use data_source::{
    DataSource, EntityRef, FetchFailure, FetchFailureKind, FetchKey, ResultKind, RoundIndex,
    SourceFuture,
};
pub use domain::{
    Circuit, Constructor, Driver, Location, Position, Race, ResultRow, Round, Season, SessionKind,
    SessionResultSet, StandingEntity, StandingEntry,
};
pub use error::{CoreError, ValidationError};
pub use fetcher::{Fetched, ResultFetcher};
pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use pacing::RequestPacer;
pub use sort::{sort_drivers, SortDirection, SortField};
pub use standings::{with_gaps, GappedStanding, NO_GAP};
pub use view::{CircuitDetail, EntitySeason, RaceDetail, SeasonView};
