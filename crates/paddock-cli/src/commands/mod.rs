mod circuit;
mod circuits;
mod constructors;
mod drivers;
mod entity;
mod results;
mod schedule;
mod standings;

use std::fmt::Display;

use paddock_core::domain::calendar::parse_date;
use paddock_core::{FetchConfig, Season, SeasonView};
use serde_json::Value;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Table;

/// A command's payload: JSON for `--format json`, a table otherwise.
pub struct CommandOutput {
    pub data: Value,
    pub table: Table,
}

impl CommandOutput {
    pub fn new(data: Value, table: Table) -> Self {
        Self { data, table }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let season = match &cli.season {
        Some(raw) => Season::parse(raw)?,
        None => Season::current(),
    };
    let as_of = evaluation_date(cli.as_of.as_deref())?;
    let config = fetch_config(cli);
    debug!(season = %season, base_url = %config.base_url, "running command");

    let view = SeasonView::from_config(season, config);

    match &cli.command {
        Command::Schedule => schedule::run(&view, as_of).await,
        Command::Results(args) => results::run(&view, args).await,
        Command::Driver(args) => entity::run_driver(&view, args, as_of).await,
        Command::Constructor(args) => entity::run_constructor(&view, args, as_of).await,
        Command::Standings(args) => standings::run(&view, args).await,
        Command::Drivers(args) => drivers::run(&view, args, as_of).await,
        Command::Constructors => constructors::run(&view).await,
        Command::Circuits => circuits::run(&view).await,
        Command::Circuit(args) => circuit::run(&view, args).await,
    }
}

/// Environment configuration overlaid with command-line overrides.
fn fetch_config(cli: &Cli) -> FetchConfig {
    let mut config = FetchConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(concurrency) = cli.concurrency {
        config = config.with_max_concurrency(concurrency);
    }
    config
}

fn evaluation_date(raw: Option<&str>) -> Result<Date, CliError> {
    match raw {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

/// Table cell for an optional value.
pub(crate) fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |value| value.to_string())
}
