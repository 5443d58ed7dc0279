use std::sync::Arc;

use lodging_core::LodgingApp;

pub struct LodgingAxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    pub app: Arc<LodgingApp<R, P>>,
}

impl<R, P> Clone for LodgingAxumState<R, P>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
        }
    }
}
