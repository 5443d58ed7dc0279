use std::sync::Arc;

use lodging_core::{LodgingApp, ServiceCapabilities, ServiceMethodKind};
use lodging_store::DocumentStore;
use serde_json::Value;

use super::assignments_hooks::ValidateAssignment;
use crate::services::types::ASSIGNMENTS;
use crate::services::RetreatParams;

pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethodKind::Create,
        ServiceMethodKind::Find,
        ServiceMethodKind::Get,
        ServiceMethodKind::Patch,
        ServiceMethodKind::Remove,
    ])
}

/// Assignment deletion is unconditional, so only writes are hooked.
pub fn register_hooks(
    app: &LodgingApp<Value, RetreatParams>,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<()> {
    let validate = Arc::new(ValidateAssignment::new(store));

    app.service(ASSIGNMENTS)?.hooks(|h| {
        h.before_create(validate.clone());
        h.before_patch(validate);
    });
    Ok(())
}
