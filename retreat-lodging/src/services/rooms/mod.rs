pub mod rooms_schema;
pub mod rooms_service;
pub mod rooms_shared;

pub use rooms_service::rooms_service;
