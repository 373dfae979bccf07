use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ValidationError;

/// Championship year, always four ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season(u16);

impl Season {
    /// Parse a season such as `"2025"`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let valid = trimmed.len() == 4 && trimmed.chars().all(|ch| ch.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidSeason {
                value: input.to_owned(),
            });
        }

        trimmed
            .parse::<u16>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidSeason {
                value: input.to_owned(),
            })
    }

    /// Season of the current UTC calendar year.
    pub fn current() -> Self {
        let year = OffsetDateTime::now_utc().year().clamp(1000, 9999);
        Self(year as u16)
    }

    pub const fn year(self) -> u16 {
        self.0
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Season {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Season {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Season> for String {
    fn from(value: Season) -> Self {
        value.to_string()
    }
}

/// Ordinal position of a race within its season.
///
/// The API encodes rounds as strings; ordering here is numeric so that
/// round 10 sorts after round 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Round(u32);

impl Round {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(ValidationError::InvalidRound {
                value: input.to_owned(),
            }),
        }
    }

    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidRound {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for Round {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Round {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Round {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Round> for String {
    fn from(value: Round) -> Self {
        value.to_string()
    }
}
