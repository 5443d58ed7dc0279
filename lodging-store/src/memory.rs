use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use lodging_core::errors::LodgingError;
use lodging_core::Identity;

use crate::{DocumentStore, Filter};

type Collection = IndexMap<Identity, Value>;

/// In-process store. Each operation takes the lock once, so single
/// operations are atomic; sequences of them are not.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, record: Value) -> Result<Identity> {
        let Value::Object(mut obj) = record else {
            return Err(LodgingError::bad_request("records must be JSON objects").into_anyhow());
        };

        let id = Identity::generate();
        obj.insert("id".to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, Value::Object(obj));

        tracing::trace!(collection, %id, "inserted");
        Ok(id)
    }

    async fn find_all(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .into_iter()
            .flat_map(|c| c.values())
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    async fn find_one(&self, collection: &str, id: &Identity) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &Identity,
        partial: Map<String, Value>,
    ) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(Value::Object(doc)) = collections.get_mut(collection).and_then(|c| c.get_mut(id))
        else {
            return Ok(0);
        };

        for (key, value) in partial {
            if key == "id" {
                continue;
            }
            doc.insert(key, value);
        }
        Ok(1)
    }

    async fn delete(&self, collection: &str, id: &Identity) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|c| c.shift_remove(id))
            .is_some();
        Ok(u64::from(removed))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        let n = collections
            .get(collection)
            .map(|c| c.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(n as u64)
    }
}
