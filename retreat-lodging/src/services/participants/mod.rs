pub mod participants_schema;
pub mod participants_service;
pub mod participants_shared;

pub use participants_service::participants_service;
