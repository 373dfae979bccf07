use paddock_core::{CircuitDetail, SeasonView};

use crate::cli::EntityArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

pub async fn run(view: &SeasonView, args: &EntityArgs) -> Result<CommandOutput, CliError> {
    let detail = view.circuit(&args.id).await?;
    let table = circuit_table(&detail);
    Ok(CommandOutput::new(serde_json::to_value(&detail)?, table))
}

fn circuit_table(detail: &CircuitDetail) -> Table {
    let circuit = &detail.circuit;
    let location = &circuit.location;
    let mut table = Table::new(
        format!(
            "{} ({}, {}) at {} / {}",
            circuit.name,
            location.locality,
            location.country,
            or_dash(location.lat),
            or_dash(location.long)
        ),
        vec!["round", "date", "race"],
    );
    for race in &detail.races {
        table.push(vec![
            race.round.to_string(),
            race.date.to_string(),
            race.name.clone(),
        ]);
    }
    table
}
