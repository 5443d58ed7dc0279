use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use lodging_core::errors::LodgingError;
use lodging_core::{CallContext, Identity, ServiceCapabilities};
use lodging_store::{DocumentStore, Filter};
use serde_json::{json, Map, Value};

use crate::services::RetreatParams;

fn now_ts() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

/// CRUD over one collection of the document store.
///
/// Payloads reaching `_create` and `_patch` have already been validated and
/// normalized by the service's schema hooks.
pub struct DocumentAdapter {
    pub store: Arc<dyn DocumentStore>,
    pub collection: &'static str,
    /// Singular name used in messages, e.g. `Room`.
    pub label: &'static str,
    pub capabilities: ServiceCapabilities,
}

impl DocumentAdapter {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str, label: &'static str) -> Self {
        Self {
            store,
            collection,
            label,
            capabilities: ServiceCapabilities::standard_crud(),
        }
    }

    fn not_found(&self, id: &str) -> anyhow::Error {
        LodgingError::not_found(format!("{} not found: {id}", self.label)).into_anyhow()
    }

    fn require_id<'a>(&self, id: Option<&'a str>, msg: &'static str) -> Result<&'a str> {
        id.ok_or_else(|| LodgingError::bad_request(msg).into_anyhow())
    }

    fn object(data: Value) -> Result<Map<String, Value>> {
        match data {
            Value::Object(obj) => Ok(obj),
            _ => Err(LodgingError::bad_request("expected a JSON object").into_anyhow()),
        }
    }

    /// Every record matching `filter`.
    pub async fn find_where(&self, filter: &Filter) -> Result<Vec<Value>> {
        self.store.find_all(self.collection, filter).await
    }

    pub async fn _find(&self, _ctx: &CallContext, _params: RetreatParams) -> Result<Vec<Value>> {
        self.find_where(&Filter::all()).await
    }

    pub async fn _get(&self, _ctx: &CallContext, id: &str, _params: RetreatParams) -> Result<Value> {
        let identity = Identity::parse(id)?;
        self.store
            .find_one(self.collection, &identity)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn _create(&self, _ctx: &CallContext, data: Value, _params: RetreatParams) -> Result<Value> {
        let mut obj = Self::object(data)?;
        obj.remove("id");

        let ts = now_ts();
        obj.insert("created_at".to_string(), ts.clone());
        obj.insert("updated_at".to_string(), ts);

        let id = self.store.insert(self.collection, Value::Object(obj)).await?;
        Ok(json!({ "id": id }))
    }

    pub async fn _patch(
        &self,
        _ctx: &CallContext,
        id: Option<&str>,
        data: Value,
        _params: RetreatParams,
    ) -> Result<Value> {
        let id = self.require_id(id, "Patch requires an id")?;
        let identity = Identity::parse(id)?;

        let mut partial = Self::object(data)?;
        for key in ["id", "created_at"] {
            partial.remove(key);
        }
        partial.insert("updated_at".to_string(), now_ts());

        if self.store.update_fields(self.collection, &identity, partial).await? == 0 {
            return Err(self.not_found(id));
        }

        self.store
            .find_one(self.collection, &identity)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn _remove(&self, _ctx: &CallContext, id: Option<&str>, _params: RetreatParams) -> Result<Value> {
        let id = self.require_id(id, "Remove requires an id")?;
        let identity = Identity::parse(id)?;

        if self.store.delete(self.collection, &identity).await? == 0 {
            return Err(self.not_found(id));
        }

        Ok(json!({ "id": identity, "deleted": true }))
    }
}

lodging_core::lodging_adapter!(DocumentAdapter, serde_json::Value, crate::services::RetreatParams);
