//! Per-day room capacity.
//!
//! Occupancy is counted from the assignments collection on every write;
//! nothing is cached. The count and the following insert are separate store
//! operations, so two concurrent writers can both pass the check.

use anyhow::Result;
use lodging_core::errors::LodgingError;
use lodging_core::Identity;
use lodging_store::{DocumentStore, Filter};
use serde_json::{json, Value};

use crate::model::RetreatDay;
use crate::services::types::ASSIGNMENTS;

/// A room's capacity; missing or malformed counts as 0.
pub fn room_capacity(room: &Value) -> u64 {
    room.get("capacity")
        .and_then(Value::as_i64)
        .map(|c| c.max(0) as u64)
        .unwrap_or(0)
}

/// Fail with `Conflict` on the first day in `days` (in the given order)
/// where the room is already full. `exclude` leaves one assignment out of
/// the count, so an assignment never blocks itself on update.
pub async fn ensure_capacity(
    store: &dyn DocumentStore,
    room_id: &Identity,
    capacity: u64,
    days: &[RetreatDay],
    exclude: Option<Identity>,
) -> Result<()> {
    for day in days {
        let mut filter = Filter::eq("room_id", room_id.to_string()).and_eq("stay_days", day.number());
        if let Some(id) = exclude {
            filter = filter.excluding(id);
        }

        let assigned = store.count(ASSIGNMENTS, &filter).await?;
        if assigned >= capacity {
            tracing::info!(%room_id, %day, capacity, assigned, "room is full");
            return Err(LodgingError::conflict(format!("capacity reached for day {day}"))
                .with_data(json!({
                    "room_id": room_id,
                    "day": day,
                    "capacity": capacity,
                    "assigned": assigned,
                }))
                .into_anyhow());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodging_core::ErrorKind;
    use lodging_store::MemoryStore;

    fn days(raw: &[i64]) -> Vec<RetreatDay> {
        raw.iter().map(|&d| RetreatDay::parse(d).unwrap()).collect()
    }

    async fn assign(store: &MemoryStore, room: &Identity, stay_days: &[i64]) -> Identity {
        store
            .insert(
                ASSIGNMENTS,
                json!({
                    "participant_id": Identity::generate(),
                    "room_id": room,
                    "stay_days": stay_days,
                }),
            )
            .await
            .unwrap()
    }

    #[test]
    fn capacity_defaults_to_zero() {
        assert_eq!(room_capacity(&json!({"capacity": 3})), 3);
        assert_eq!(room_capacity(&json!({"capacity": "3"})), 0);
        assert_eq!(room_capacity(&json!({})), 0);
    }

    #[tokio::test]
    async fn full_day_is_reported_with_details() {
        let store = MemoryStore::new();
        let room = Identity::generate();
        assign(&store, &room, &[1, 2]).await;
        assign(&store, &room, &[1]).await;

        ensure_capacity(&store, &room, 2, &days(&[2, 3]), None).await.unwrap();

        let err = ensure_capacity(&store, &room, 2, &days(&[3, 1, 2]), None)
            .await
            .unwrap_err();
        let e = LodgingError::from_anyhow(&err).unwrap();
        assert_eq!(e.kind, ErrorKind::Conflict);
        assert_eq!(e.message, "capacity reached for day 1");
        assert_eq!(
            e.data.clone().unwrap(),
            json!({"room_id": room, "day": 1, "capacity": 2, "assigned": 2})
        );
    }

    #[tokio::test]
    async fn an_assignment_does_not_block_itself() {
        let store = MemoryStore::new();
        let room = Identity::generate();
        let own = assign(&store, &room, &[1]).await;

        assert!(ensure_capacity(&store, &room, 1, &days(&[1]), None).await.is_err());
        ensure_capacity(&store, &room, 1, &days(&[1]), Some(own)).await.unwrap();
    }

    #[tokio::test]
    async fn zero_capacity_rooms_take_nobody() {
        let store = MemoryStore::new();
        let room = Identity::generate();
        assert!(ensure_capacity(&store, &room, 0, &days(&[1]), None).await.is_err());
    }
}
