use time::macros::format_description;
use time::{Date, Time};

use crate::ValidationError;

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(pub(crate) clock_time, Time, "[hour]:[minute]:[second]");

/// Parse an API calendar date (`2025-03-16`).
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

/// Parse an API time of day. The API suffixes UTC times with `Z`.
pub fn parse_time(input: &str) -> Result<Time, ValidationError> {
    let trimmed = input.trim();
    let without_zone = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    Time::parse(without_zone, format_description!("[hour]:[minute]:[second]")).map_err(|_| {
        ValidationError::InvalidTime {
            value: input.to_owned(),
        }
    })
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
