//! Domain vocabulary shared by the services and the summary.

use std::fmt;

use lodging_core::errors::LodgingError;
use serde::{Deserialize, Serialize};

/// Retreat days run 1..=3.
pub const RETREAT_DAYS: [RetreatDay; 3] = [RetreatDay(1), RetreatDay(2), RetreatDay(3)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct RetreatDay(u8);

impl RetreatDay {
    pub fn number(self) -> u8 {
        self.0
    }

    /// Parse a day, failing with `BadRequest` outside 1..=3.
    pub fn parse(raw: i64) -> anyhow::Result<Self> {
        Self::try_from(raw)
            .map_err(|_| LodgingError::bad_request(format!("invalid day {raw}: days must be 1, 2 or 3")).into_anyhow())
    }
}

impl TryFrom<i64> for RetreatDay {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1..=3 => Ok(Self(raw as u8)),
            _ => Err(raw),
        }
    }
}

impl From<RetreatDay> for u8 {
    fn from(day: RetreatDay) -> Self {
        day.0
    }
}

impl fmt::Display for RetreatDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Who a room may house.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPolicy {
    Male,
    Female,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Dorm,
    Double,
    Private,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cooling {
    #[default]
    Ventilated,
    AirConditioned,
}
