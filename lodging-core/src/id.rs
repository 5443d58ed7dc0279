//! Opaque record identities.
//!
//! Identities cross the HTTP boundary as strings. Anything that does not
//! parse is rejected as `BadRequest` here, before it can reach a store.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::LodgingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| LodgingError::bad_request(format!("invalid identifier: {raw}")).into_anyhow())
    }
}

impl FromStr for Identity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
