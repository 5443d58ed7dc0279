use anyhow::Result;
use lodging_axum::{http, AxumApp};
use lodging_core::LodgingApp;
use serde_json::Value;

use crate::services::RetreatParams;

pub fn retreat_app() -> Result<AxumApp<Value, RetreatParams>> {
    let app: LodgingApp<Value, RetreatParams> = LodgingApp::new();
    crate::config::apply_defaults(&app);
    crate::config::load_env(&app);
    crate::hooks::global_hooks(&app);
    Ok(http(app))
}
