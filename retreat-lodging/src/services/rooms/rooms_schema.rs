use lodging_schema::PartialUpdate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{Cooling, GenderPolicy, RoomType};

pub const ERROR_MESSAGE: &str = "Rooms schema validation failed";

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct NewRoom {
    pub name: String,

    #[validate(range(min = 1, max = 100, message = "capacity must be between 1 and 100"))]
    pub capacity: i64,

    #[serde(default)]
    pub gender: GenderPolicy,

    #[serde(default, rename = "type")]
    pub room_type: RoomType,

    #[serde(default)]
    pub cooling: Cooling,

    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Allow-list for partial updates.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(range(min = 1, max = 100, message = "capacity must be between 1 and 100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<GenderPolicy>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling: Option<Cooling>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
}

impl PartialUpdate for RoomPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.capacity.is_none()
            && self.gender.is_none()
            && self.room_type.is_none()
            && self.cooling.is_none()
            && self.amenities.is_none()
    }
}
