//! Liveness report for `/health`.

use std::collections::BTreeMap;

use lodging_store::{DocumentStore, Filter};
use serde::Serialize;

use crate::services::types::{ASSIGNMENTS, PARTICIPANTS, ROOMS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Connected,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub backend: &'static str,
    pub store: StoreStatus,
    /// Record count per collection. Empty when the store is unavailable.
    pub collections: BTreeMap<&'static str, u64>,
}

/// Counts every collection. A failing store is reported, not raised.
pub async fn check(store: &dyn DocumentStore) -> Health {
    let mut collections = BTreeMap::new();
    let all = Filter::all();

    for name in [ROOMS, PARTICIPANTS, ASSIGNMENTS] {
        match store.count(name, &all).await {
            Ok(n) => {
                collections.insert(name, n);
            }
            Err(err) => {
                tracing::warn!(collection = name, error = %err, "store unavailable");
                return Health {
                    backend: "running",
                    store: StoreStatus::Unavailable,
                    collections: BTreeMap::new(),
                };
            }
        }
    }

    Health {
        backend: "running",
        store: StoreStatus::Connected,
        collections,
    }
}
