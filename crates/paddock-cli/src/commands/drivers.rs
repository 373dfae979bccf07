use paddock_core::{Driver, SeasonView, SortDirection, SortField};
use serde::Serialize;
use time::Date;

use crate::cli::DriversArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{or_dash, CommandOutput};

#[derive(Debug, Serialize)]
struct RosterEntry<'a> {
    #[serde(flatten)]
    driver: &'a Driver,
    age: Option<u32>,
}

pub async fn run(
    view: &SeasonView,
    args: &DriversArgs,
    as_of: Date,
) -> Result<CommandOutput, CliError> {
    let field: SortField = args.sort_by.parse()?;
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let drivers = view.drivers(field, direction, as_of).await?;

    let roster: Vec<RosterEntry<'_>> = drivers
        .iter()
        .map(|driver| RosterEntry {
            driver,
            age: driver.age_on(as_of),
        })
        .collect();

    let mut table = Table::new(
        format!("{} drivers by {field}", view.season()),
        vec!["no", "code", "name", "nationality", "born", "age"],
    );
    for entry in &roster {
        table.push(vec![
            or_dash(entry.driver.permanent_number),
            or_dash(entry.driver.code.as_deref()),
            entry.driver.full_name(),
            or_dash(entry.driver.nationality.as_deref()),
            or_dash(entry.driver.date_of_birth),
            or_dash(entry.age),
        ]);
    }

    let data = serde_json::json!({
        "season": view.season(),
        "sort_by": field,
        "direction": direction,
        "drivers": roster,
    });
    Ok(CommandOutput::new(data, table))
}
