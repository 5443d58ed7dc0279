use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use lodging_core::errors::LodgingError;
use lodging_core::hooks::{HookContext, LodgingAroundHook, LodgingErrorHook, Next};
use lodging_core::LodgingApp;
use serde_json::Value;

use crate::services::RetreatParams;

pub struct LogAround;

#[async_trait]
impl LodgingAroundHook<Value, RetreatParams> for LogAround {
    async fn run(&self, ctx: &mut HookContext<Value, RetreatParams>, next: Next<Value, RetreatParams>) -> Result<()> {
        let started = Instant::now();
        tracing::debug!(
            app = ctx.config.get("app.name").unwrap_or("-"),
            service = %ctx.service_name,
            method = ctx.method.as_str(),
            id = ctx.id.as_deref().unwrap_or("-"),
            request_id = ctx.call.request_id.as_deref().unwrap_or("-"),
            provider = %ctx.call.provider,
            "call"
        );

        let res = next.run(ctx).await;

        tracing::debug!(
            service = %ctx.service_name,
            method = ctx.method.as_str(),
            ok = res.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "done"
        );
        res
    }
}

pub struct LogError;

#[async_trait]
impl LodgingErrorHook<Value, RetreatParams> for LogError {
    async fn run(&self, ctx: &mut HookContext<Value, RetreatParams>) -> Result<()> {
        if let Some(err) = &ctx.error {
            let (kind, message) = match LodgingError::from_anyhow(err) {
                Some(e) => (e.name(), e.message.clone()),
                None => ("GeneralError", err.to_string()),
            };
            tracing::warn!(
                service = %ctx.service_name,
                method = ctx.method.as_str(),
                id = ctx.id.as_deref().unwrap_or("-"),
                request_id = ctx.call.request_id.as_deref().unwrap_or("-"),
                kind,
                %message,
                "call failed"
            );
        }
        Ok(())
    }
}

pub fn global_hooks(app: &LodgingApp<Value, RetreatParams>) {
    app.hooks(|h| {
        h.around_all(Arc::new(LogAround));
        h.error_all(Arc::new(LogError));
    });
}
