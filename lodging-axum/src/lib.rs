//! lodging-axum: serve lodging services over HTTP with axum.
//!
//! `AxumApp::use_service` mounts the REST routes a service's capabilities
//! allow; `into_router` adds request ids, tracing and CORS.

pub mod app;
pub mod params;
pub mod rest;
pub mod state;
mod error;
pub use error::LodgingAxumError;
pub use state::LodgingAxumState;

pub use app::{http, AxumApp};
