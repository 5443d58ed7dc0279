use lodging_schema::PartialUpdate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{Gender, RoomType};

pub const ERROR_MESSAGE: &str = "Participants schema validation failed";

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct NewParticipant {
    pub full_name: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub parish: Option<String>,
    pub special_needs: Option<String>,
    pub preference: Option<RoomType>,
}

/// Allow-list for partial updates. An explicit `null` reads as absent.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ParticipantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[validate(email(message = "email must be a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_needs: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<RoomType>,
}

impl PartialUpdate for ParticipantPatch {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.gender.is_none()
            && self.parish.is_none()
            && self.special_needs.is_none()
            && self.preference.is_none()
    }
}
