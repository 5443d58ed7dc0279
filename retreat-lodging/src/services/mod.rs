use std::sync::Arc;

use lodging_axum::AxumApp;
use lodging_store::DocumentStore;
use serde_json::Value;

pub mod adapters;
pub mod assignments;
pub mod guards;
pub mod participants;
pub mod rooms;
pub mod types;

pub use types::RetreatParams;

/// Mount the three services, then attach their hooks.
pub fn configure(
    ax: AxumApp<Value, RetreatParams>,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<AxumApp<Value, RetreatParams>> {
    let ax = ax
        .use_service("/rooms", Arc::new(rooms::rooms_service(Arc::clone(&store))))
        .use_service(
            "/participants",
            Arc::new(participants::participants_service(Arc::clone(&store))),
        )
        .use_service(
            "/assignments",
            Arc::new(assignments::AssignmentsService::new(Arc::clone(&store))),
        );

    let app = ax.app.as_ref();
    rooms::rooms_shared::register_hooks(app, Arc::clone(&store))?;
    participants::participants_shared::register_hooks(app, Arc::clone(&store))?;
    assignments::assignments_shared::register_hooks(app, store)?;

    Ok(ax)
}
