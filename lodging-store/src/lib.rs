//! lodging-store: the document store the lodging services read and write.
//!
//! Records are JSON objects keyed by an [`Identity`] the store assigns on
//! insert and writes back into the record as `"id"`.

mod filter;
mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use lodging_core::Identity;

pub use filter::Filter;
pub use memory::MemoryStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `record` under a fresh identity and return it.
    async fn insert(&self, collection: &str, record: Value) -> Result<Identity>;

    /// Every record matching `filter`, in insertion order.
    async fn find_all(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;

    async fn find_one(&self, collection: &str, id: &Identity) -> Result<Option<Value>>;

    /// Overwrite the given top-level fields. Returns the matched count (0 or 1).
    async fn update_fields(
        &self,
        collection: &str,
        id: &Identity,
        partial: Map<String, Value>,
    ) -> Result<u64>;

    /// Returns the deleted count (0 or 1).
    async fn delete(&self, collection: &str, id: &Identity) -> Result<u64>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;
}
