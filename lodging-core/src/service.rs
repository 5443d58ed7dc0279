use anyhow::Result;
use async_trait::async_trait;

use crate::context::CallContext;
use crate::errors::LodgingError;

/// Service methods a resource can expose:
/// find, get, create, patch, remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceMethodKind {
    Find,
    Get,
    Create,
    Patch,
    Remove,
}

impl ServiceMethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMethodKind::Find => "find",
            ServiceMethodKind::Get => "get",
            ServiceMethodKind::Create => "create",
            ServiceMethodKind::Patch => "patch",
            ServiceMethodKind::Remove => "remove",
        }
    }
}

/// Capabilities describe which methods a service wants to expose
/// to the outside world.
///
/// The HTTP adapter mounts only the routes listed here.
#[derive(Debug, Clone)]
pub struct ServiceCapabilities {
    pub allowed_methods: Vec<ServiceMethodKind>,
}

impl ServiceCapabilities {
    /// find, get, create, patch, remove.
    pub fn standard_crud() -> Self {
        use ServiceMethodKind::*;
        Self {
            allowed_methods: vec![Find, Get, Create, Patch, Remove],
        }
    }

    pub fn from_methods(methods: Vec<ServiceMethodKind>) -> Self {
        Self {
            allowed_methods: methods,
        }
    }

    pub fn allows(&self, method: ServiceMethodKind) -> bool {
        self.allowed_methods.contains(&method)
    }
}

/// Core service trait:
///
/// - `find`   → list/query many
/// - `get`    → fetch one by id
/// - `create` → create one
/// - `patch`  → partial update
/// - `remove` → delete one
///
/// Every method defaults to a `NotImplemented` error, so a service
/// overrides only what it supports.
#[async_trait]
pub trait LodgingService<R, P = ()>: Send + Sync
where
    R: Send + 'static,
    P: Send + 'static,
{
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::standard_crud()
    }

    async fn find(&self, _ctx: &CallContext, _params: P) -> Result<Vec<R>> {
        Err(LodgingError::not_implemented("Method not implemented: find").into_anyhow())
    }

    async fn get(&self, _ctx: &CallContext, _id: &str, _params: P) -> Result<R> {
        Err(LodgingError::not_implemented("Method not implemented: get").into_anyhow())
    }

    async fn create(&self, _ctx: &CallContext, _data: R, _params: P) -> Result<R> {
        Err(LodgingError::not_implemented("Method not implemented: create").into_anyhow())
    }

    /// Partially update an existing record. `id` is `None` when the
    /// transport did not supply one.
    async fn patch(
        &self,
        _ctx: &CallContext,
        _id: Option<&str>,
        _data: R,
        _params: P,
    ) -> Result<R> {
        Err(LodgingError::not_implemented("Method not implemented: patch").into_anyhow())
    }

    async fn remove(&self, _ctx: &CallContext, _id: Option<&str>, _params: P) -> Result<R> {
        Err(LodgingError::not_implemented("Method not implemented: remove").into_anyhow())
    }
}
