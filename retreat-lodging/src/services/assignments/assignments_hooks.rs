use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use lodging_core::errors::LodgingError;
use lodging_core::hooks::{HookContext, LodgingBeforeHook};
use lodging_core::{Identity, ServiceMethodKind};
use lodging_schema::{validate, validate_patch};
use lodging_store::DocumentStore;
use serde_json::Value;

use super::assignments_schema::{AssignmentInput, AssignmentPatch, CheckedAssignment, ERROR_MESSAGE};
use super::capacity::{ensure_capacity, room_capacity};
use crate::services::types::{ASSIGNMENTS, PARTICIPANTS, ROOMS};
use crate::services::RetreatParams;

/// Validates assignment writes and replaces `ctx.data` with the stored form.
///
/// Order: stay days, identity syntax, participant exists, room exists,
/// capacity for each requested day. Updates are merged over the stored
/// record first and excluded from their own capacity count.
pub struct ValidateAssignment {
    store: Arc<dyn DocumentStore>,
}

impl ValidateAssignment {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The effective payload of a patch: the stored record overlaid with
    /// the supplied allow-listed fields.
    async fn merged_patch(&self, ctx: &HookContext<Value, RetreatParams>, data: &Value) -> Result<(Identity, Value)> {
        let patch: AssignmentPatch = validate_patch(data, ERROR_MESSAGE)?;

        let raw = ctx
            .id
            .as_deref()
            .ok_or_else(|| LodgingError::bad_request("Patch requires an id").into_anyhow())?;
        let id = Identity::parse(raw)?;

        let current = self
            .store
            .find_one(ASSIGNMENTS, &id)
            .await?
            .ok_or_else(|| LodgingError::not_found(format!("Assignment not found: {raw}")).into_anyhow())?;

        Ok((id, AssignmentInput::merged(&current, patch)))
    }

    async fn check(
        &self,
        ctx: &HookContext<Value, RetreatParams>,
        input: &AssignmentInput,
        exclude: Option<Identity>,
    ) -> Result<CheckedAssignment> {
        let checked = input.check()?;

        // Direct service calls skip hooks; these are plain lookups.
        let participants = ctx.services.service::<Value, RetreatParams>(PARTICIPANTS)?;
        participants
            .get(&ctx.call, &checked.participant_id.to_string(), ctx.params.clone())
            .await?;

        let rooms = ctx.services.service::<Value, RetreatParams>(ROOMS)?;
        let room = rooms
            .get(&ctx.call, &checked.room_id.to_string(), ctx.params.clone())
            .await?;

        ensure_capacity(
            self.store.as_ref(),
            &checked.room_id,
            room_capacity(&room),
            &checked.stay_days,
            exclude,
        )
        .await?;

        Ok(checked)
    }
}

#[async_trait]
impl LodgingBeforeHook<Value, RetreatParams> for ValidateAssignment {
    async fn run(&self, ctx: &mut HookContext<Value, RetreatParams>) -> Result<()> {
        let data = ctx
            .data
            .take()
            .ok_or_else(|| anyhow::anyhow!("ValidateAssignment requires ctx.data"))?;

        let checked = match ctx.method {
            ServiceMethodKind::Create => {
                let input: AssignmentInput = validate(&data, ERROR_MESSAGE)?;
                self.check(ctx, &input, None).await?
            }
            ServiceMethodKind::Patch => {
                let (id, merged) = self.merged_patch(ctx, &data).await?;
                let input: AssignmentInput = validate(&merged, ERROR_MESSAGE)?;
                self.check(ctx, &input, Some(id)).await?
            }
            _ => {
                ctx.data = Some(data);
                return Ok(());
            }
        };

        ctx.data = Some(checked.to_document());
        Ok(())
    }
}
