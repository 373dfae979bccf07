use std::io::{self, Write};

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

/// Tabular view of a command's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: Vec<&'static str>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        if !self.title.is_empty() {
            writeln!(out, "{}", self.title)?;
        }

        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().map(|header| header.to_uppercase()));
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }
        let mut table = builder.build();
        table.with(Style::psql());
        writeln!(out, "{table}")?;

        if self.rows.is_empty() {
            writeln!(out, "(no rows)")?;
        }
        Ok(())
    }
}

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.data)?
            } else {
                serde_json::to_string(&output.data)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => output.table.write_to(&mut out)?,
    }

    Ok(())
}
