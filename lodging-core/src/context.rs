//! Per-call context passed into services and hooks.

/// Context carried with every service call.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Transport that issued the call, e.g. `rest` or `internal`.
    pub provider: String,
    pub request_id: Option<String>,
}

impl CallContext {
    pub fn new<S: Into<String>>(provider: S) -> Self {
        Self {
            provider: provider.into(),
            request_id: None,
        }
    }

    /// Calls made by the application itself (tests, sibling services).
    pub fn internal() -> Self {
        Self::new("internal")
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::internal()
    }
}
