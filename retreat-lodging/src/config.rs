//! Runtime settings.
//!
//! Defaults are set on the app, then `.env` and `RETREAT__*` variables
//! override them. `PORT` is honored for hosted deployments.

use lodging_core::LodgingApp;
use serde_json::Value;

use crate::services::RetreatParams;

pub const ENV_PREFIX: &str = "RETREAT__";

const DEFAULTS: [(&str, &str); 3] = [
    ("app.name", "retreat-lodging"),
    ("http.host", "0.0.0.0"),
    ("http.port", "8000"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl HttpConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn apply_defaults(app: &LodgingApp<Value, RetreatParams>) {
    for (key, value) in DEFAULTS {
        app.set(key, value);
    }
}

/// Overlay the environment onto the defaults.
pub fn load_env(app: &LodgingApp<Value, RetreatParams>) {
    if let Ok(port) = std::env::var("PORT") {
        app.set("http.port", port);
    }
    let applied = app.load_env(ENV_PREFIX);
    tracing::debug!(applied, "environment overrides");
}

pub fn http_config(app: &LodgingApp<Value, RetreatParams>) -> anyhow::Result<HttpConfig> {
    let host = app.get("http.host").unwrap_or_else(|| "0.0.0.0".to_string());
    let port = app.get("http.port").unwrap_or_else(|| "8000".to_string());
    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|e| anyhow::anyhow!("invalid http.port {port:?}: {e}"))?;

    Ok(HttpConfig { host, port })
}
