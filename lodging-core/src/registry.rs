use std::collections::HashMap;
use std::sync::Arc;

use crate::LodgingService;

/// Maps service names to service instances, so any transport
/// (HTTP, tests, sibling hooks) can reach them by name.
pub struct LodgingServiceRegistry<R, P = ()>
where
    R: Send + 'static,
    P: Send + 'static,
{
    services: HashMap<String, Arc<dyn LodgingService<R, P>>>,
}

impl<R, P> LodgingServiceRegistry<R, P>
where
    R: Send + 'static,
    P: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    pub fn register<S>(&mut self, name: S, service: Arc<dyn LodgingService<R, P>>)
    where
        S: Into<String>,
    {
        self.services.insert(name.into(), service);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn LodgingService<R, P>>> {
        self.services.get(name)
    }
}

impl<R, P> Default for LodgingServiceRegistry<R, P>
where
    R: Send + 'static,
    P: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
