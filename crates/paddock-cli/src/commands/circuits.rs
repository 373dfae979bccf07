use paddock_core::SeasonView;

use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

pub async fn run(view: &SeasonView) -> Result<CommandOutput, CliError> {
    let circuits = view.circuits().await?;

    let mut table = Table::new(
        format!("{} circuits", view.season()),
        vec!["id", "name", "locality", "country", "lat", "long"],
    );
    for circuit in circuits.iter() {
        table.push(vec![
            circuit.id.clone(),
            circuit.name.clone(),
            circuit.location.locality.clone(),
            circuit.location.country.clone(),
            or_dash(circuit.location.lat),
            or_dash(circuit.location.long),
        ]);
    }

    Ok(CommandOutput::new(serde_json::to_value(circuits.as_slice())?, table))
}
