pub mod assignments_hooks;
pub mod assignments_params;
pub mod assignments_schema;
pub mod assignments_service;
pub mod assignments_shared;
pub mod capacity;

pub use assignments_params::AssignmentQuery;
pub use assignments_service::AssignmentsService;
