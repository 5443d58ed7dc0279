use std::sync::Arc;

use lodging_store::DocumentStore;

use crate::services::adapters::DocumentAdapter;
use crate::services::types::ROOMS;

pub fn rooms_service(store: Arc<dyn DocumentStore>) -> DocumentAdapter {
    DocumentAdapter::new(store, ROOMS, "Room")
}
