use paddock_core::SeasonView;

use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

pub async fn run(view: &SeasonView) -> Result<CommandOutput, CliError> {
    let constructors = view.constructors().await?;

    let mut table = Table::new(
        format!("{} constructors", view.season()),
        vec!["id", "name", "nationality"],
    );
    for constructor in constructors.iter() {
        table.push(vec![
            constructor.id.clone(),
            constructor.name.clone(),
            or_dash(constructor.nationality.as_deref()),
        ]);
    }

    Ok(CommandOutput::new(
        serde_json::to_value(constructors.as_slice())?,
        table,
    ))
}
