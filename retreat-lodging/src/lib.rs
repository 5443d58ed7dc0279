pub mod app;
pub mod config;
pub mod hooks;
pub mod model;
pub mod services;
pub mod status;
pub mod summary;

use std::sync::Arc;

use anyhow::Result;
use axum::Json;
use lodging_axum::{AxumApp, LodgingAxumError};
use lodging_store::{DocumentStore, MemoryStore};
use serde_json::{json, Value};

pub use services::RetreatParams;

/// Build the app over a fresh in-memory store.
pub fn build() -> Result<AxumApp<Value, RetreatParams>> {
    build_with_store(Arc::new(MemoryStore::new()))
}

pub fn build_with_store(store: Arc<dyn DocumentStore>) -> Result<AxumApp<Value, RetreatParams>> {
    let ax = services::configure(app::retreat_app()?, Arc::clone(&store))?;

    let banner = ax
        .app
        .get("app.name")
        .unwrap_or_else(|| "retreat-lodging".to_string());

    let health_store = Arc::clone(&store);

    let ax = ax
        .use_get("/", move || {
            let banner = banner.clone();
            async move { Json(json!({ "message": format!("{banner}: room allocation for a three-day retreat") })) }
        })
        .use_get("/summary", move || {
            let store = Arc::clone(&store);
            async move {
                let summary = summary::snapshot(store.as_ref()).await?;
                Ok::<_, LodgingAxumError>(Json(summary))
            }
        })
        .use_get("/health", move || {
            let store = Arc::clone(&health_store);
            async move { Json(status::check(store.as_ref()).await) }
        });

    Ok(ax)
}
