use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use lodging_core::errors::LodgingError;
use lodging_core::hooks::{HookContext, LodgingBeforeHook};
use lodging_core::Identity;
use lodging_store::{DocumentStore, Filter};
use serde_json::{json, Value};

use crate::services::types::ASSIGNMENTS;
use crate::services::RetreatParams;

/// Refuses to remove a record while any assignment points at it through
/// `field` (`room_id` or `participant_id`).
pub struct RestrictWhileAssigned {
    store: Arc<dyn DocumentStore>,
    field: &'static str,
    label: &'static str,
}

impl RestrictWhileAssigned {
    pub fn new(store: Arc<dyn DocumentStore>, field: &'static str, label: &'static str) -> Self {
        Self { store, field, label }
    }
}

#[async_trait]
impl LodgingBeforeHook<Value, RetreatParams> for RestrictWhileAssigned {
    async fn run(&self, ctx: &mut HookContext<Value, RetreatParams>) -> Result<()> {
        let Some(raw) = ctx.id.as_deref() else {
            return Ok(());
        };
        let id = Identity::parse(raw)?;

        let assignments = self
            .store
            .count(ASSIGNMENTS, &Filter::eq(self.field, id.to_string()))
            .await?;

        if assignments > 0 {
            tracing::info!(
                service = %ctx.service_name,
                %id,
                assignments,
                "delete refused while assignments reference the record"
            );
            return Err(LodgingError::conflict(format!(
                "{} {id} is referenced by {assignments} assignment(s)",
                self.label
            ))
            .with_data(json!({ "id": id, "assignments": assignments }))
            .into_anyhow());
        }

        Ok(())
    }
}
