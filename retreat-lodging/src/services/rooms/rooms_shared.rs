use std::sync::Arc;

use lodging_core::schema::SchemaHooksExt;
use lodging_core::LodgingApp;
use lodging_schema::{normalize, normalize_patch};
use lodging_store::DocumentStore;
use serde_json::Value;

use super::rooms_schema::{NewRoom, RoomPatch, ERROR_MESSAGE};
use crate::services::guards::RestrictWhileAssigned;
use crate::services::types::ROOMS;
use crate::services::RetreatParams;

pub fn register_hooks(
    app: &LodgingApp<Value, RetreatParams>,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<()> {
    app.service(ROOMS)?.hooks(|h| {
        h.schema(|s| {
            s.on_create()
                .resolve(|data, _meta| normalize::<NewRoom>(data, ERROR_MESSAGE));
            s.on_patch()
                .resolve(|data, _meta| normalize_patch::<RoomPatch>(data, ERROR_MESSAGE));
        });

        h.before_remove(Arc::new(RestrictWhileAssigned::new(store, "room_id", "Room")));
    });
    Ok(())
}
