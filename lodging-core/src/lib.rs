//! lodging-core: transport-agnostic services, hooks and errors for the
//! retreat lodging backend.

pub mod adapters;
pub mod app;
pub mod config;
pub mod context;
pub mod errors;
pub mod hooks;
pub mod id;
pub mod registry;
pub mod schema;
pub mod service;

pub use app::{LodgingApp, ServiceCaller, ServiceHandle};
pub use config::{LodgingConfig, LodgingConfigSnapshot};
pub use context::CallContext;
pub use errors::{ErrorKind, LodgingError};
pub use hooks::{
    HookContext, HookResult, LodgingAfterHook, LodgingAroundHook, LodgingBeforeHook,
    LodgingErrorHook, Next, ServiceHooks,
};
pub use id::Identity;
pub use registry::LodgingServiceRegistry;
pub use service::{LodgingService, ServiceCapabilities, ServiceMethodKind};
