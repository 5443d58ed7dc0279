//! Occupancy dashboard.
//!
//! Recomputed from the three collections on every request.

use std::collections::BTreeMap;

use anyhow::Result;
use lodging_store::{DocumentStore, Filter};
use serde::Serialize;
use serde_json::Value;

use crate::model::{RetreatDay, RETREAT_DAYS};
use crate::services::assignments::capacity::room_capacity;
use crate::services::types::{ASSIGNMENTS, PARTICIPANTS, ROOMS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayLoad {
    pub capacity: u64,
    pub assigned: u64,
    pub remaining: u64,
}

impl DayLoad {
    fn settle(&mut self) {
        self.remaining = self.capacity.saturating_sub(self.assigned);
    }
}

type DayMap = BTreeMap<u8, DayLoad>;

fn empty_days(capacity: u64) -> DayMap {
    RETREAT_DAYS
        .iter()
        .map(|d| {
            (
                d.number(),
                DayLoad {
                    capacity,
                    ..DayLoad::default()
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomOccupancy {
    pub name: Value,
    pub capacity: u64,
    pub days: DayMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub rooms: u64,
    pub participants: u64,
    pub assignments: u64,
    pub days: DayMap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoolingCounts {
    pub ventilated: u64,
    pub air_conditioned: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomTypeCounts {
    pub dorm: u64,
    pub double: u64,
    pub private: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: u64,
    pub female: u64,
    pub unknown: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Keyed by room id.
    pub occupancy: BTreeMap<String, RoomOccupancy>,
    pub totals: Totals,
    pub cooling: CoolingCounts,
    pub room_types: RoomTypeCounts,
    pub genders: GenderCounts,
}

fn str_field<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Retreat days named by an assignment. Anything else is skipped.
fn stay_days(assignment: &Value) -> impl Iterator<Item = RetreatDay> + '_ {
    assignment
        .get("stay_days")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_i64)
        .filter_map(|d| RetreatDay::try_from(d).ok())
}

pub fn aggregate(rooms: &[Value], participants: &[Value], assignments: &[Value]) -> Summary {
    let mut occupancy = BTreeMap::new();
    let mut totals = Totals {
        rooms: rooms.len() as u64,
        participants: participants.len() as u64,
        assignments: assignments.len() as u64,
        days: empty_days(0),
    };
    let mut cooling = CoolingCounts::default();
    let mut room_types = RoomTypeCounts::default();
    let mut genders = GenderCounts::default();

    for room in rooms {
        let capacity = room_capacity(room);

        match str_field(room, "cooling") {
            Some("ventilated") => cooling.ventilated += 1,
            Some("air_conditioned") => cooling.air_conditioned += 1,
            _ => {}
        }
        match str_field(room, "type") {
            Some("dorm") => room_types.dorm += 1,
            Some("double") => room_types.double += 1,
            Some("private") => room_types.private += 1,
            _ => {}
        }

        for load in totals.days.values_mut() {
            load.capacity += capacity;
        }

        let Some(id) = str_field(room, "id") else {
            continue;
        };
        occupancy.insert(
            id.to_string(),
            RoomOccupancy {
                name: room.get("name").cloned().unwrap_or(Value::Null),
                capacity,
                days: empty_days(capacity),
            },
        );
    }

    for assignment in assignments {
        let room_id = str_field(assignment, "room_id");

        for day in stay_days(assignment) {
            if let Some(load) = totals.days.get_mut(&day.number()) {
                load.assigned += 1;
            }
            if let Some(load) = room_id
                .and_then(|id| occupancy.get_mut(id))
                .and_then(|r| r.days.get_mut(&day.number()))
            {
                load.assigned += 1;
            }
        }
    }

    for participant in participants {
        match str_field(participant, "gender") {
            Some("male") => genders.male += 1,
            Some("female") => genders.female += 1,
            _ => genders.unknown += 1,
        }
    }

    for room in occupancy.values_mut() {
        room.days.values_mut().for_each(DayLoad::settle);
    }
    totals.days.values_mut().for_each(DayLoad::settle);

    Summary {
        occupancy,
        totals,
        cooling,
        room_types,
        genders,
    }
}

pub async fn snapshot(store: &dyn DocumentStore) -> Result<Summary> {
    let all = Filter::all();
    let rooms = store.find_all(ROOMS, &all).await?;
    let participants = store.find_all(PARTICIPANTS, &all).await?;
    let assignments = store.find_all(ASSIGNMENTS, &all).await?;

    Ok(aggregate(&rooms, &participants, &assignments))
}
