pub type RetreatParams = lodging_axum::params::RestParams;

pub const ROOMS: &str = "rooms";
pub const PARTICIPANTS: &str = "participants";
pub const ASSIGNMENTS: &str = "assignments";
