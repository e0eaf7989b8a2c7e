//! Domain-level features and their shared logic. Routes import these modules
//! to keep view code focused while session, auth, and face handling stay in
//! dedicated feature areas.

pub mod auth;
pub mod face;
pub mod session;
