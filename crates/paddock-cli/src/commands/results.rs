use paddock_core::{Round, SeasonView, SessionKind};

use crate::cli::ResultsArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

pub async fn run(view: &SeasonView, args: &ResultsArgs) -> Result<CommandOutput, CliError> {
    let round = Round::parse(&args.round)?;
    let kind = if args.sprint {
        SessionKind::Sprint
    } else {
        SessionKind::Main
    };

    let detail = view.race_detail(round, kind).await?;

    let mut table = Table::new(
        format!("{} {} ({})", detail.race.season, detail.race.name, kind.as_str()),
        vec!["pos", "no", "driver", "constructor", "laps", "time/status", "points"],
    );
    for row in &detail.rows {
        table.push(vec![
            row.position.label(),
            or_dash(row.number),
            row.driver.full_name(),
            row.constructor.name.clone(),
            or_dash(row.laps),
            or_dash(row.time_or_status()),
            row.points.to_string(),
        ]);
    }

    Ok(CommandOutput::new(serde_json::to_value(&detail)?, table))
}
