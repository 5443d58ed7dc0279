use lodging_core::errors::LodgingError;
use lodging_core::Identity;
use lodging_schema::PartialUpdate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::model::RetreatDay;

pub const ERROR_MESSAGE: &str = "Assignments schema validation failed";

/// Assignment payload as it arrives, before its days and ids are checked.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AssignmentInput {
    pub participant_id: String,
    pub room_id: String,
    pub stay_days: Vec<i64>,
}

/// Allow-list for assignment updates.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct AssignmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stay_days: Option<Vec<i64>>,
}

impl PartialUpdate for AssignmentPatch {
    fn is_empty(&self) -> bool {
        self.participant_id.is_none() && self.room_id.is_none() && self.stay_days.is_none()
    }
}

/// An assignment whose days are retreat days and whose references are
/// well-formed identities. Existence and capacity are not checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedAssignment {
    pub participant_id: Identity,
    pub room_id: Identity,
    /// As given: neither sorted nor deduplicated.
    pub stay_days: Vec<RetreatDay>,
}

impl AssignmentInput {
    /// Days first, then identities.
    pub fn check(&self) -> anyhow::Result<CheckedAssignment> {
        let stay_days = self
            .stay_days
            .iter()
            .map(|&d| RetreatDay::parse(d))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let (participant_id, room_id) = match (
            Identity::parse(&self.participant_id),
            Identity::parse(&self.room_id),
        ) {
            (Ok(p), Ok(r)) => (p, r),
            _ => {
                return Err(LodgingError::bad_request("invalid participant_id or room_id")
                    .with_data(json!({
                        "participant_id": self.participant_id,
                        "room_id": self.room_id,
                    }))
                    .into_anyhow())
            }
        };

        Ok(CheckedAssignment {
            participant_id,
            room_id,
            stay_days,
        })
    }

    /// Overlay `patch` on a stored assignment.
    pub fn merged(current: &Value, patch: AssignmentPatch) -> Value {
        let field = |name: &str| current.get(name).cloned().unwrap_or(Value::Null);

        json!({
            "participant_id": patch.participant_id.map(Value::String).unwrap_or_else(|| field("participant_id")),
            "room_id": patch.room_id.map(Value::String).unwrap_or_else(|| field("room_id")),
            "stay_days": patch.stay_days.map(|d| json!(d)).unwrap_or_else(|| field("stay_days")),
        })
    }
}

impl CheckedAssignment {
    pub fn to_document(&self) -> Value {
        json!({
            "participant_id": self.participant_id,
            "room_id": self.room_id,
            "stay_days": self.stay_days,
        })
    }
}
