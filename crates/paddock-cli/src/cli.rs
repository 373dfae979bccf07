//! CLI argument definitions for paddock.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `schedule` | Season calendar with upcoming flag |
//! | `results` | One round's main or sprint classification |
//! | `driver` | Correlated season results for a driver |
//! | `constructor` | Correlated season results for a constructor's drivers |
//! | `standings` | Driver or constructor standings with points gaps |
//! | `drivers` | Season driver roster, sorted |
//! | `constructors` | Season constructors |
//! | `circuits` | Season circuits |
//! | `circuit` | One circuit and the rounds held there |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--season` | current year | Championship season |
//! | `--as-of` | today (UTC) | Date separating past from upcoming races |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `PADDOCK_TIMEOUT_MS` or `5000` | Per-request timeout |
//! | `--concurrency` | `PADDOCK_MAX_CONCURRENCY` or `4` | Sprint fan-out width |
//! | `--base-url` | `PADDOCK_BASE_URL` or Jolpica | API root |
//! | `--log-level` | `warn` | Log filter when `RUST_LOG` is unset |
//!
//! # Examples
//!
//! ```bash
//! paddock schedule --season 2024 --format table
//! paddock results 6 --sprint --pretty
//! paddock driver norris --as-of 2025-06-01
//! paddock standings constructors --format table
//! paddock drivers --sort-by number --desc
//! paddock circuit monza --season 2024
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Formula 1 season results from the Jolpica API.
#[derive(Debug, Parser)]
#[command(
    name = "paddock",
    author,
    version,
    about = "Formula 1 season results CLI",
    long_about = "paddock fetches season calendars, race and sprint classifications, \
standings and rosters from the Ergast-compatible Jolpica API and correlates them \
into per-driver and per-constructor season views.\n\
\n\
Use 'paddock <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Championship season (four-digit year). Defaults to the current year.
    #[arg(long, global = true)]
    pub season: Option<String>,

    /// Evaluation date (YYYY-MM-DD); races after it are upcoming.
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds; 0 disables it.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Maximum concurrent sprint requests.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// API root URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log filter used when RUST_LOG is not set (e.g. info, paddock_core=debug).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON document.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Season calendar.
    ///
    /// # Examples
    ///
    ///   paddock schedule
    ///   paddock schedule --season 2023 --format table
    Schedule,

    /// Classification of one round.
    ///
    /// # Examples
    ///
    ///   paddock results 3
    ///   paddock results 6 --sprint
    Results(ResultsArgs),

    /// Season results of one driver, race by race.
    ///
    /// # Examples
    ///
    ///   paddock driver max_verstappen
    Driver(EntityArgs),

    /// Season results of every driver of one constructor.
    ///
    /// # Examples
    ///
    ///   paddock constructor ferrari --format table
    Constructor(EntityArgs),

    /// Championship standings with points gaps.
    ///
    /// # Examples
    ///
    ///   paddock standings drivers
    ///   paddock standings constructors --format table
    Standings(StandingsArgs),

    /// Season driver roster.
    ///
    /// # Examples
    ///
    ///   paddock drivers --sort-by last-name
    ///   paddock drivers --sort-by age --desc
    Drivers(DriversArgs),

    /// Season constructors.
    Constructors,

    /// Season circuits.
    Circuits,

    /// One circuit and the season's rounds held there.
    ///
    /// # Examples
    ///
    ///   paddock circuit silverstone --format table
    Circuit(EntityArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ResultsArgs {
    /// Round number within the season.
    pub round: String,

    /// Show the sprint classification instead of the main race.
    #[arg(long, default_value_t = false)]
    pub sprint: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EntityArgs {
    /// Stable API identifier (e.g. `norris`, `red_bull`).
    pub id: String,
}

#[derive(Debug, Clone, Args)]
pub struct StandingsArgs {
    #[arg(value_enum)]
    pub table: StandingsTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StandingsTable {
    Drivers,
    Constructors,
}

#[derive(Debug, Clone, Args)]
pub struct DriversArgs {
    /// Sort key: first-name, last-name, number or age.
    #[arg(long, default_value = "last-name")]
    pub sort_by: String,

    /// Sort descending.
    #[arg(long, default_value_t = false)]
    pub desc: bool,
}
