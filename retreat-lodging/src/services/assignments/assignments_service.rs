use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use lodging_core::{CallContext, LodgingService, ServiceCapabilities};
use lodging_store::DocumentStore;
use serde_json::Value;

use super::assignments_shared;
use super::AssignmentQuery;
use crate::services::adapters::DocumentAdapter;
use crate::services::types::ASSIGNMENTS;
use crate::services::RetreatParams;

pub struct AssignmentsService {
    pub adapter: DocumentAdapter,
}

impl AssignmentsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            adapter: DocumentAdapter::new(store, ASSIGNMENTS, "Assignment"),
        }
    }
}

#[async_trait]
impl LodgingService<Value, RetreatParams> for AssignmentsService {
    fn capabilities(&self) -> ServiceCapabilities {
        assignments_shared::crud_capabilities()
    }

    async fn find(&self, _ctx: &CallContext, params: RetreatParams) -> Result<Vec<Value>> {
        let query = AssignmentQuery::from_params(&params)?;
        self.adapter.find_where(&query.filter()).await
    }

    async fn get(&self, ctx: &CallContext, id: &str, params: RetreatParams) -> Result<Value> {
        self.adapter._get(ctx, id, params).await
    }

    async fn create(&self, ctx: &CallContext, data: Value, params: RetreatParams) -> Result<Value> {
        self.adapter._create(ctx, data, params).await
    }

    async fn patch(
        &self,
        ctx: &CallContext,
        id: Option<&str>,
        data: Value,
        params: RetreatParams,
    ) -> Result<Value> {
        self.adapter._patch(ctx, id, data, params).await
    }

    async fn remove(&self, ctx: &CallContext, id: Option<&str>, params: RetreatParams) -> Result<Value> {
        self.adapter._remove(ctx, id, params).await
    }
}
