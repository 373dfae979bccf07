//! Points gaps between consecutive standings entries.

use serde::{Deserialize, Serialize};

use crate::{StandingEntry, ValidationError};

/// Marker used for the last entry, which has no lower-ranked neighbour.
pub const NO_GAP: &str = "-";

/// A standings entry annotated with the points gap to the entry below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GappedStanding {
    #[serde(flatten)]
    pub standing: StandingEntry,
    pub gap: String,
}

/// Annotate `standings` with the points difference to the next entry.
///
/// Positive gaps are rendered with a leading `+`, ties as `0`, and the last
/// entry gets [`NO_GAP`]. Input order is kept as given. Points that do not
/// parse as a number fail the whole call.
pub fn with_gaps(standings: &[StandingEntry]) -> Result<Vec<GappedStanding>, ValidationError> {
    let points = standings
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_points(index, &entry.points))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(standings
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let gap = points
                .get(index + 1)
                .map(|next| format_gap(points[index] - next))
                .unwrap_or_else(|| String::from(NO_GAP));
            GappedStanding {
                standing: entry.clone(),
                gap,
            }
        })
        .collect())
}

fn parse_points(index: usize, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|points| points.is_finite())
        .ok_or_else(|| ValidationError::InvalidPoints {
            index,
            value: raw.to_owned(),
        })
}

fn format_gap(delta: f64) -> String {
    // Points are awarded in at most half-point steps.
    let rounded = (delta * 100.0).round() / 100.0;
    if rounded == 0.0 {
        String::from("0")
    } else if rounded > 0.0 {
        format!("+{rounded}")
    } else {
        rounded.to_string()
    }
}
