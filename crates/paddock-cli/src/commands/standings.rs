use paddock_core::{GappedStanding, SeasonView, StandingEntity};

use crate::cli::{StandingsArgs, StandingsTable};
use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

pub async fn run(view: &SeasonView, args: &StandingsArgs) -> Result<CommandOutput, CliError> {
    let (title, standings) = match args.table {
        StandingsTable::Drivers => ("driver standings", view.driver_standings().await?),
        StandingsTable::Constructors => {
            ("constructor standings", view.constructor_standings().await?)
        }
    };

    let mut table = Table::new(
        format!("{} {title}", view.season()),
        vec!["pos", "name", "team", "points", "wins", "gap"],
    );
    for entry in &standings {
        table.push(standing_row(entry));
    }

    Ok(CommandOutput::new(serde_json::to_value(&standings)?, table))
}

fn standing_row(entry: &GappedStanding) -> Vec<String> {
    let standing = &entry.standing;
    let team = match &standing.entity {
        StandingEntity::Driver { constructors, .. } => constructors
            .iter()
            .map(|constructor| constructor.name.as_str())
            .collect::<Vec<_>>()
            .join(" / "),
        StandingEntity::Constructor { constructor } => or_dash(constructor.nationality.as_deref()),
    };

    vec![
        standing.position_text.clone(),
        standing.entity.display_name(),
        team,
        standing.points.clone(),
        standing.wins.to_string(),
        entry.gap.clone(),
    ]
}
