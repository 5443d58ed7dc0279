use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

use crate::hooks::{collect_method_hooks, HookFut};
use crate::{
    CallContext, HookContext, HookResult, LodgingAfterHook, LodgingAroundHook, LodgingBeforeHook,
    LodgingConfig, LodgingConfigSnapshot, LodgingErrorHook, LodgingService,
    LodgingServiceRegistry, Next, ServiceHooks, ServiceMethodKind,
};

struct LodgingAppInner<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    registry: RwLock<LodgingServiceRegistry<R, P>>,
    global_hooks: RwLock<ServiceHooks<R, P>>,
    service_hooks: RwLock<HashMap<String, ServiceHooks<R, P>>>,
    config: RwLock<LodgingConfig>,
    // Arc<dyn LodgingService<R, P>> erased, for typed lookups from hooks
    any_services: RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

/// Central application container.
///
/// Transport-agnostic. Holds:
/// - service registry
/// - app hooks
/// - per-service hooks
/// - config
pub struct LodgingApp<R, P = ()>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    inner: Arc<LodgingAppInner<R, P>>,
}

type HooksForMethod<R, P> = (
    Vec<Arc<dyn LodgingAroundHook<R, P>>>,
    Vec<Arc<dyn LodgingBeforeHook<R, P>>>,
    Vec<Arc<dyn LodgingAfterHook<R, P>>>,
    Vec<Arc<dyn LodgingErrorHook<R, P>>>,
);

type ServiceCall<R, P> = Arc<
    dyn for<'a> Fn(Arc<dyn LodgingService<R, P>>, &'a mut HookContext<R, P>) -> HookFut<'a>
        + Send
        + Sync,
>;

fn service_call<R, P, F>(f: F) -> ServiceCall<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
    F: for<'a> Fn(Arc<dyn LodgingService<R, P>>, &'a mut HookContext<R, P>) -> HookFut<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn next_fn<R, P, F>(f: F) -> Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
    F: for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send + 'static,
{
    Next { call: Box::new(f) }
}

impl<R, P> Default for LodgingApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> Clone for LodgingApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, P> LodgingApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LodgingAppInner {
                registry: RwLock::new(LodgingServiceRegistry::new()),
                global_hooks: RwLock::new(ServiceHooks::new()),
                service_hooks: RwLock::new(HashMap::new()),
                config: RwLock::new(LodgingConfig::new()),
                any_services: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn register_service<S>(&self, name: S, service: Arc<dyn LodgingService<R, P>>)
    where
        S: Into<String>,
    {
        let name = name.into();

        self.inner
            .registry
            .write()
            .register(name.clone(), Arc::clone(&service));

        self.inner
            .any_services
            .write()
            .insert(name, Box::new(service));
    }

    /// Feathers: `app.hooks({ ... })`
    pub fn hooks<F>(&self, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut g = self.inner.global_hooks.write();
        f(&mut g);
    }

    pub(crate) fn configure_service_hooks<F>(&self, service_name: &str, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut map = self.inner.service_hooks.write();
        let hooks = map.entry(service_name.to_string()).or_default();
        f(hooks);
    }

    /// Feathers: `app.service("name")`
    pub fn service(&self, name: &str) -> Result<ServiceHandle<R, P>> {
        let svc = self
            .inner
            .registry
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not found: {name}"))?;

        Ok(ServiceHandle {
            app: self.clone(),
            name: name.to_string(),
            service: svc,
        })
    }

    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.config.write().set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.config.read().get(key).map(|v| v.to_string())
    }

    /// Overlay `PREFIX__SECTION__KEY` environment variables onto the config.
    pub fn load_env(&self, prefix: &str) -> usize {
        self.inner
            .config
            .write()
            .merge_prefixed(prefix, std::env::vars())
    }

    pub fn config_snapshot(&self) -> LodgingConfigSnapshot {
        self.inner.config.read().snapshot()
    }
}

pub struct ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: LodgingApp<R, P>,
    name: String,
    service: Arc<dyn LodgingService<R, P>>,
}

impl<R, P> ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    /// Feathers: `app.service("x").hooks({ ... })`
    pub fn hooks<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        self.app.configure_service_hooks(&self.name, f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

}

// ──────────────────────────────────────────────────────────────
// Pipeline
// ──────────────────────────────────────────────────────────────

impl<R, P> ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    /// Global hooks first, then service hooks.
    fn collect_hooks_for_method(&self, method: &ServiceMethodKind) -> HooksForMethod<R, P> {
        let g = self.app.inner.global_hooks.read();
        let map = self.app.inner.service_hooks.read();

        let mut around = collect_method_hooks(&g.around_all, &g.around_by_method, method);
        let mut before = collect_method_hooks(&g.before_all, &g.before_by_method, method);
        let mut after = collect_method_hooks(&g.after_all, &g.after_by_method, method);
        let mut error = collect_method_hooks(&g.error_all, &g.error_by_method, method);

        if let Some(h) = map.get(&self.name) {
            around.extend(collect_method_hooks(&h.around_all, &h.around_by_method, method));
            before.extend(collect_method_hooks(&h.before_all, &h.before_by_method, method));
            after.extend(collect_method_hooks(&h.after_all, &h.after_by_method, method));
            error.extend(collect_method_hooks(&h.error_all, &h.error_by_method, method));
        }

        (around, before, after, error)
    }

    fn context(&self, call: CallContext, method: ServiceMethodKind, params: P) -> HookContext<R, P> {
        HookContext::new(
            call,
            self.name.clone(),
            method,
            params,
            ServiceCaller::new(self.app.clone()),
            self.app.config_snapshot(),
        )
    }

    /// around → before → service_call → after, then error hooks on failure.
    async fn run_pipeline(
        &self,
        mut ctx: HookContext<R, P>,
        call: ServiceCall<R, P>,
    ) -> Result<HookContext<R, P>> {
        let (around, before, after, error) = self.collect_hooks_for_method(&ctx.method);

        let svc = Arc::clone(&self.service);

        let mut next = next_fn(move |ctx: &mut HookContext<R, P>| -> HookFut<'_> {
            Box::pin(async move {
                for h in &before {
                    h.run(ctx).await?;
                }

                (call)(svc, ctx).await?;

                for h in &after {
                    h.run(ctx).await?;
                }

                Ok(())
            })
        });

        // first around hook is outermost
        for h in around.iter().rev() {
            let hook = Arc::clone(h);
            let prev = next;
            next = next_fn(move |ctx: &mut HookContext<R, P>| -> HookFut<'_> {
                Box::pin(async move { hook.run(ctx, prev).await })
            });
        }

        if let Err(e) = next.run(&mut ctx).await {
            ctx.error = Some(e);

            for h in &error {
                let _ = h.run(&mut ctx).await;
            }

            if let Some(err) = ctx.error.take() {
                return Err(err);
            }
        }

        Ok(ctx)
    }

    pub async fn find(&self, call: CallContext, params: P) -> Result<Vec<R>> {
        let ctx = self.context(call, ServiceMethodKind::Find, params);

        let ctx = self
            .run_pipeline(
                ctx,
                service_call(|svc: Arc<dyn LodgingService<R, P>>, ctx| {
                    Box::pin(async move {
                        let records = svc.find(&ctx.call, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::Many(records));
                        Ok(())
                    })
                }),
            )
            .await?;

        match ctx.result {
            Some(HookResult::Many(v)) => Ok(v),
            Some(HookResult::One(_)) => Err(anyhow::anyhow!(
                "find() produced HookResult::One unexpectedly"
            )),
            None => Ok(vec![]),
        }
    }

    pub async fn get(&self, call: CallContext, id: &str, params: P) -> Result<R> {
        let mut ctx = self.context(call, ServiceMethodKind::Get, params);
        ctx.id = Some(id.to_string());

        let ctx = self
            .run_pipeline(
                ctx,
                service_call(|svc: Arc<dyn LodgingService<R, P>>, ctx| {
                    Box::pin(async move {
                        let id = ctx
                            .id
                            .clone()
                            .ok_or_else(|| anyhow::anyhow!("get() requires ctx.id"))?;
                        let record = svc.get(&ctx.call, &id, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::One(record));
                        Ok(())
                    })
                }),
            )
            .await?;

        Self::expect_one(ctx.result, "get")
    }

    pub async fn create(&self, call: CallContext, data: R, params: P) -> Result<R> {
        let mut ctx = self.context(call, ServiceMethodKind::Create, params);
        ctx.data = Some(data);

        let ctx = self
            .run_pipeline(
                ctx,
                service_call(|svc: Arc<dyn LodgingService<R, P>>, ctx| {
                    Box::pin(async move {
                        let data = ctx
                            .data
                            .take()
                            .ok_or_else(|| anyhow::anyhow!("create() requires ctx.data"))?;
                        let created = svc.create(&ctx.call, data, ctx.params.clone()).await?;
                        ctx.result = Some(HookResult::One(created));
                        Ok(())
                    })
                }),
            )
            .await?;

        Self::expect_one(ctx.result, "create")
    }

    pub async fn patch(&self, call: CallContext, id: Option<&str>, data: R, params: P) -> Result<R> {
        let mut ctx = self.context(call, ServiceMethodKind::Patch, params);
        ctx.id = id.map(|s| s.to_string());
        ctx.data = Some(data);

        let ctx = self
            .run_pipeline(
                ctx,
                service_call(|svc: Arc<dyn LodgingService<R, P>>, ctx| {
                    Box::pin(async move {
                        let data = ctx
                            .data
                            .take()
                            .ok_or_else(|| anyhow::anyhow!("patch() requires ctx.data"))?;
                        let id = ctx.id.clone();
                        let patched = svc
                            .patch(&ctx.call, id.as_deref(), data, ctx.params.clone())
                            .await?;
                        ctx.result = Some(HookResult::One(patched));
                        Ok(())
                    })
                }),
            )
            .await?;

        Self::expect_one(ctx.result, "patch")
    }

    pub async fn remove(&self, call: CallContext, id: Option<&str>, params: P) -> Result<R> {
        let mut ctx = self.context(call, ServiceMethodKind::Remove, params);
        ctx.id = id.map(|s| s.to_string());

        let ctx = self
            .run_pipeline(
                ctx,
                service_call(|svc: Arc<dyn LodgingService<R, P>>, ctx| {
                    Box::pin(async move {
                        let id = ctx.id.clone();
                        let removed = svc
                            .remove(&ctx.call, id.as_deref(), ctx.params.clone())
                            .await?;
                        ctx.result = Some(HookResult::One(removed));
                        Ok(())
                    })
                }),
            )
            .await?;

        Self::expect_one(ctx.result, "remove")
    }

    fn expect_one(result: Option<HookResult<R>>, method: &str) -> Result<R> {
        match result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow::anyhow!(
                "{method}() produced HookResult::Many unexpectedly"
            )),
            None => Err(anyhow::anyhow!("{method}() produced no result")),
        }
    }
}

/// Typed access to sibling services from inside hooks.
pub struct ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: LodgingApp<R, P>,
}

impl<R, P> Clone for ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
        }
    }
}

impl<R, P> ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(app: LodgingApp<R, P>) -> Self {
        Self { app }
    }

    /// Look up a registered service by name. The call bypasses that
    /// service's hooks.
    pub fn service<R2, P2>(&self, name: &str) -> Result<Arc<dyn LodgingService<R2, P2>>>
    where
        R2: Send + 'static,
        P2: Send + 'static,
    {
        let map = self.app.inner.any_services.read();

        let any = map
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Service not found: {name}"))?;

        let stored = any
            .as_ref()
            .downcast_ref::<Arc<dyn LodgingService<R2, P2>>>()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Service type mismatch for '{name}'. \
                     The requested <R, P> differs from the registered one."
                )
            })?;

        Ok(Arc::clone(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, LodgingError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    type Trace = Arc<Mutex<Vec<String>>>;

    struct Echo;

    #[async_trait]
    impl LodgingService<String, ()> for Echo {
        async fn create(&self, _ctx: &CallContext, data: String, _params: ()) -> Result<String> {
            Ok(data)
        }

        async fn get(&self, _ctx: &CallContext, id: &str, _params: ()) -> Result<String> {
            if id == "missing" {
                return Err(LodgingError::not_found("nothing here").into_anyhow());
            }
            Ok(id.to_string())
        }
    }

    struct Mark(&'static str, Trace);

    #[async_trait]
    impl LodgingBeforeHook<String, ()> for Mark {
        async fn run(&self, ctx: &mut HookContext<String, ()>) -> Result<()> {
            self.1.lock().push(format!("before:{}", self.0));
            if let Some(data) = ctx.data.as_mut() {
                data.push_str(self.0);
            }
            Ok(())
        }
    }

    struct Wrap(Trace);

    #[async_trait]
    impl LodgingAroundHook<String, ()> for Wrap {
        async fn run(&self, ctx: &mut HookContext<String, ()>, next: Next<String, ()>) -> Result<()> {
            self.0.lock().push("around:in".to_string());
            let res = next.run(ctx).await;
            self.0.lock().push("around:out".to_string());
            res
        }
    }

    struct Upper;

    #[async_trait]
    impl LodgingAfterHook<String, ()> for Upper {
        async fn run(&self, ctx: &mut HookContext<String, ()>) -> Result<()> {
            if let Some(HookResult::One(v)) = ctx.result.as_mut() {
                *v = v.to_uppercase();
            }
            Ok(())
        }
    }

    struct Recover;

    #[async_trait]
    impl LodgingErrorHook<String, ()> for Recover {
        async fn run(&self, ctx: &mut HookContext<String, ()>) -> Result<()> {
            ctx.error = None;
            ctx.result = Some(HookResult::One("fallback".to_string()));
            Ok(())
        }
    }

    fn app_with_echo() -> LodgingApp<String, ()> {
        let app = LodgingApp::new();
        app.register_service("echo", Arc::new(Echo));
        app
    }

    #[tokio::test]
    async fn global_hooks_run_before_service_hooks() {
        let app = app_with_echo();
        let trace: Trace = Arc::default();

        app.hooks(|h| {
            h.around_all(Arc::new(Wrap(Arc::clone(&trace))));
            h.before_all(Arc::new(Mark("g", Arc::clone(&trace))));
        });
        app.service("echo")
            .unwrap()
            .hooks(|h| {
                h.before_create(Arc::new(Mark("s", Arc::clone(&trace))));
                h.after_all(Arc::new(Upper));
            });

        let out = app
            .service("echo")
            .unwrap()
            .create(CallContext::internal(), "x".to_string(), ())
            .await
            .unwrap();

        assert_eq!(out, "XGS");
        assert_eq!(
            *trace.lock(),
            vec!["around:in", "before:g", "before:s", "around:out"]
        );
    }

    #[tokio::test]
    async fn method_specific_hooks_do_not_leak() {
        let app = app_with_echo();
        let trace: Trace = Arc::default();

        app.service("echo")
            .unwrap()
            .hooks(|h| {
                h.before_create(Arc::new(Mark("c", Arc::clone(&trace))));
            });

        let out = app
            .service("echo")
            .unwrap()
            .get(CallContext::internal(), "abc", ())
            .await
            .unwrap();

        assert_eq!(out, "abc");
        assert!(trace.lock().is_empty());
    }

    #[tokio::test]
    async fn errors_keep_their_kind_unless_recovered() {
        let app = app_with_echo();

        let err = app
            .service("echo")
            .unwrap()
            .get(CallContext::internal(), "missing", ())
            .await
            .unwrap_err();
        assert_eq!(LodgingError::from_anyhow(&err).unwrap().kind, ErrorKind::NotFound);

        app.service("echo")
            .unwrap()
            .hooks(|h| {
                h.error(ServiceMethodKind::Get, Arc::new(Recover));
            });

        let out = app
            .service("echo")
            .unwrap()
            .get(CallContext::internal(), "missing", ())
            .await
            .unwrap();
        assert_eq!(out, "fallback");
    }

    #[tokio::test]
    async fn unimplemented_methods_report_not_implemented() {
        let app = app_with_echo();

        let err = app
            .service("echo")
            .unwrap()
            .remove(CallContext::internal(), Some("x"), ())
            .await
            .unwrap_err();
        assert_eq!(
            LodgingError::from_anyhow(&err).unwrap().kind,
            ErrorKind::NotImplemented
        );
    }

    struct Shelf;

    #[async_trait]
    impl LodgingService<String, ()> for Shelf {
        async fn find(&self, _ctx: &CallContext, _params: ()) -> Result<Vec<String>> {
            Ok(vec!["a".to_string(), "b".to_string()])
        }

        async fn patch(&self, _ctx: &CallContext, id: Option<&str>, data: String, _params: ()) -> Result<String> {
            Ok(format!("{}={data}", id.unwrap_or("-")))
        }

        async fn remove(&self, _ctx: &CallContext, id: Option<&str>, _params: ()) -> Result<String> {
            Ok(format!("gone:{}", id.unwrap_or("-")))
        }
    }

    #[tokio::test]
    async fn find_patch_and_remove_reach_the_service_through_hooks() {
        let app = LodgingApp::new();
        app.register_service("shelf", Arc::new(Shelf));
        let trace: Trace = Arc::default();

        app.service("shelf")
            .unwrap()
            .hooks(|h| {
                h.around_all(Arc::new(Wrap(Arc::clone(&trace))));
                h.after_all(Arc::new(Upper));
            });
        let shelf = app.service("shelf").unwrap();

        let found = shelf.find(CallContext::internal(), ()).await.unwrap();
        assert_eq!(found, vec!["a", "b"]);

        let patched = shelf
            .patch(CallContext::internal(), Some("k"), "v".to_string(), ())
            .await
            .unwrap();
        assert_eq!(patched, "K=V");

        let removed = shelf.remove(CallContext::internal(), Some("k"), ()).await.unwrap();
        assert_eq!(removed, "GONE:K");

        assert_eq!(trace.lock().len(), 6);
    }

    #[test]
    fn service_caller_checks_record_types() {
        let app = app_with_echo();
        let caller = ServiceCaller::new(app);

        assert!(caller.service::<String, ()>("echo").is_ok());
        assert!(caller.service::<u32, ()>("echo").is_err());
        assert!(caller.service::<String, ()>("nope").is_err());
    }
}
