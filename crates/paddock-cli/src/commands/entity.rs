use paddock_core::{CorrelatedRaceEntry, EntitySeason, ResultRow, SeasonView};
use time::Date;

use crate::cli::EntityArgs;
use crate::error::CliError;
use crate::output::Table;

use super::CommandOutput;

pub async fn run_driver(
    view: &SeasonView,
    args: &EntityArgs,
    as_of: Date,
) -> Result<CommandOutput, CliError> {
    let season = view.driver_view(&args.id, as_of).await?;
    render(season)
}

pub async fn run_constructor(
    view: &SeasonView,
    args: &EntityArgs,
    as_of: Date,
) -> Result<CommandOutput, CliError> {
    let season = view.constructor_view(&args.id, as_of).await?;
    render(season)
}

fn render(season: EntitySeason) -> Result<CommandOutput, CliError> {
    let mut table = Table::new(
        format!(
            "{} season of {} (as of {})",
            season.season,
            season.roster.id(),
            season.as_of
        ),
        vec!["round", "date", "race", "driver", "race result", "pts", "sprint", "sprint pts"],
    );
    for entry in &season.entries {
        table.push(entry_row(entry));
    }

    Ok(CommandOutput::new(serde_json::to_value(&season)?, table))
}

fn entry_row(entry: &CorrelatedRaceEntry) -> Vec<String> {
    let main = match (&entry.main_result, entry.main_state) {
        (Some(row), _) => row.position.label(),
        (None, state) => state.as_str().replace('_', " "),
    };

    vec![
        entry.race.round.to_string(),
        entry.race.date.to_string(),
        entry.race.name.clone(),
        entry.entity_id.clone(),
        main,
        points(entry.main_result.as_ref()),
        entry
            .sprint_result
            .as_ref()
            .map_or_else(|| String::from("-"), |row| row.position.label()),
        points(entry.sprint_result.as_ref()),
    ]
}

fn points(row: Option<&ResultRow>) -> String {
    row.map_or_else(|| String::from("-"), |row| row.points.to_string())
}
