use std::sync::Arc;

use lodging_store::DocumentStore;

use crate::services::adapters::DocumentAdapter;
use crate::services::types::PARTICIPANTS;

pub fn participants_service(store: Arc<dyn DocumentStore>) -> DocumentAdapter {
    DocumentAdapter::new(store, PARTICIPANTS, "Participant")
}
