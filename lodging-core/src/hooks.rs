//! # Hooks
//!
//! Every service call runs through a Feathers-style pipeline:
//!
//! ```text
//! around → before → service call → after
//!                  ↘ (on failure) error
//! ```
//!
//! Hooks registered on the app run before hooks registered on a service.
//! Within one table, hooks for all methods run before method-specific ones.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::{CallContext, LodgingConfigSnapshot, ServiceCaller, ServiceMethodKind};

pub type HookFut<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Output of a service call, as seen by after hooks.
#[derive(Debug, Clone)]
pub enum HookResult<R> {
    One(R),
    Many(Vec<R>),
}

/// Context passed to hooks.
///
/// R = record type
/// P = params type (query, headers, ...)
pub struct HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub call: CallContext,
    pub service_name: String,
    pub method: ServiceMethodKind,
    /// Record id for get/patch/remove.
    pub id: Option<String>,
    pub params: P,
    /// Input payload for create/patch.
    pub data: Option<R>,
    pub result: Option<HookResult<R>>,
    pub error: Option<anyhow::Error>,
    pub services: ServiceCaller<R, P>,
    pub config: LodgingConfigSnapshot,
}

impl<R, P> HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(
        call: CallContext,
        service_name: impl Into<String>,
        method: ServiceMethodKind,
        params: P,
        services: ServiceCaller<R, P>,
        config: LodgingConfigSnapshot,
    ) -> Self {
        Self {
            call,
            service_name: service_name.into(),
            method,
            id: None,
            params,
            data: None,
            result: None,
            error: None,
            services,
            config,
        }
    }
}

#[async_trait]
pub trait LodgingBeforeHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

#[async_trait]
pub trait LodgingAfterHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Runs after a failure. Clearing `ctx.error` recovers the call.
#[async_trait]
pub trait LodgingErrorHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Wraps the rest of the pipeline; must call `next.run(ctx)` to continue.
#[async_trait]
pub trait LodgingAroundHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>, next: Next<R, P>) -> Result<()>;
}

type NextFn<R, P> = Box<dyn for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send>;

/// The remainder of the pipeline, handed to around hooks.
pub struct Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) call: NextFn<R, P>,
}

impl<R, P> Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub async fn run(self, ctx: &mut HookContext<R, P>) -> Result<()> {
        (self.call)(ctx).await
    }
}

type Table<H> = HashMap<ServiceMethodKind, Vec<Arc<H>>>;

/// Hook tables for one scope (the whole app, or one service).
pub struct ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) around_all: Vec<Arc<dyn LodgingAroundHook<R, P>>>,
    pub(crate) before_all: Vec<Arc<dyn LodgingBeforeHook<R, P>>>,
    pub(crate) after_all: Vec<Arc<dyn LodgingAfterHook<R, P>>>,
    pub(crate) error_all: Vec<Arc<dyn LodgingErrorHook<R, P>>>,

    pub(crate) around_by_method: Table<dyn LodgingAroundHook<R, P>>,
    pub(crate) before_by_method: Table<dyn LodgingBeforeHook<R, P>>,
    pub(crate) after_by_method: Table<dyn LodgingAfterHook<R, P>>,
    pub(crate) error_by_method: Table<dyn LodgingErrorHook<R, P>>,
}

impl<R, P> Default for ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            around_all: Vec::new(),
            before_all: Vec::new(),
            after_all: Vec::new(),
            error_all: Vec::new(),
            around_by_method: HashMap::new(),
            before_by_method: HashMap::new(),
            after_by_method: HashMap::new(),
            error_by_method: HashMap::new(),
        }
    }

    pub fn around_all(&mut self, hook: Arc<dyn LodgingAroundHook<R, P>>) -> &mut Self {
        self.around_all.push(hook);
        self
    }

    pub fn before_all(&mut self, hook: Arc<dyn LodgingBeforeHook<R, P>>) -> &mut Self {
        self.before_all.push(hook);
        self
    }

    pub fn after_all(&mut self, hook: Arc<dyn LodgingAfterHook<R, P>>) -> &mut Self {
        self.after_all.push(hook);
        self
    }

    pub fn error_all(&mut self, hook: Arc<dyn LodgingErrorHook<R, P>>) -> &mut Self {
        self.error_all.push(hook);
        self
    }

    pub fn around(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn LodgingAroundHook<R, P>>,
    ) -> &mut Self {
        self.around_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn LodgingBeforeHook<R, P>>,
    ) -> &mut Self {
        self.before_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn after(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn LodgingAfterHook<R, P>>,
    ) -> &mut Self {
        self.after_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn error(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn LodgingErrorHook<R, P>>,
    ) -> &mut Self {
        self.error_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before_create(&mut self, hook: Arc<dyn LodgingBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Create, hook)
    }

    pub fn before_patch(&mut self, hook: Arc<dyn LodgingBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Patch, hook)
    }

    pub fn before_remove(&mut self, hook: Arc<dyn LodgingBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Remove, hook)
    }
}

/// Hooks for all methods first, then the method-specific ones.
pub(crate) fn collect_method_hooks<H: ?Sized>(
    all: &[Arc<H>],
    by_method: &HashMap<ServiceMethodKind, Vec<Arc<H>>>,
    method: &ServiceMethodKind,
) -> Vec<Arc<H>> {
    let mut out: Vec<Arc<H>> = all.to_vec();
    if let Some(specific) = by_method.get(method) {
        out.extend(specific.iter().cloned());
    }
    out
}
