use paddock_core::{Race, SeasonView};
use serde::Serialize;
use time::Date;

use crate::error::CliError;
use crate::output::Table;

use super::CommandOutput;

#[derive(Debug, Serialize)]
struct ScheduledRace<'a> {
    #[serde(flatten)]
    race: &'a Race,
    is_upcoming: bool,
}

pub async fn run(view: &SeasonView, as_of: Date) -> Result<CommandOutput, CliError> {
    let schedule = view.schedule().await?;

    let races: Vec<ScheduledRace<'_>> = schedule
        .iter()
        .map(|race| ScheduledRace {
            race,
            is_upcoming: race.is_upcoming(as_of),
        })
        .collect();

    let mut table = Table::new(
        format!("{} calendar", view.season()),
        vec!["round", "date", "race", "circuit", "country", "status"],
    );
    for entry in &races {
        table.push(vec![
            entry.race.round.to_string(),
            entry.race.date.to_string(),
            entry.race.name.clone(),
            entry.race.circuit.name.clone(),
            entry.race.circuit.location.country.clone(),
            String::from(if entry.is_upcoming { "upcoming" } else { "completed" }),
        ]);
    }

    let data = serde_json::json!({
        "season": view.season(),
        "races": races,
    });
    Ok(CommandOutput::new(data, table))
}
