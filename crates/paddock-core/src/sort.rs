//! Driver roster ordering.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::{Driver, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    FirstName,
    LastName,
    DriverNumber,
    Age,
}

impl SortField {
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::DriverNumber, Self::Age];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first-name",
            Self::LastName => "last-name",
            Self::DriverNumber => "number",
            Self::Age => "age",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "first-name" | "firstname" | "given-name" => Ok(Self::FirstName),
            "last-name" | "lastname" | "family-name" => Ok(Self::LastName),
            "number" | "driver-number" | "permanent-number" => Ok(Self::DriverNumber),
            "age" => Ok(Self::Age),
            _ => Err(ValidationError::InvalidSortField {
                value: input.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Return a sorted copy of `drivers`.
///
/// The sort is stable: drivers with equal keys keep their input order in
/// both directions, and descending is the exact reverse of ascending when no
/// keys tie. A missing permanent number (for [`SortField::DriverNumber`]) or
/// birth date (for [`SortField::Age`]) ranks above every present value, so
/// those drivers come last ascending and first descending. Age is
/// [`Driver::age_on`] as of `today`.
pub fn sort_drivers(
    drivers: &[Driver],
    field: SortField,
    direction: SortDirection,
    today: Date,
) -> Vec<Driver> {
    let mut sorted = drivers.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match field {
            SortField::FirstName => compare_names(&a.given_name, &b.given_name),
            SortField::LastName => compare_names(&a.family_name, &b.family_name),
            SortField::DriverNumber => {
                compare_missing_last(a.permanent_number, b.permanent_number)
            }
            SortField::Age => compare_missing_last(a.age_on(today), b.age_on(today)),
        };
        direction.apply(ordering)
    });
    sorted
}

/// Accent- and case-insensitive order, so `Pérez` sits between `Norris` and
/// `Piastri`. Names with equal keys fall back to case-insensitive, then
/// case-sensitive comparison.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Base letters only: canonical decomposition with combining marks dropped,
/// lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn compare_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
