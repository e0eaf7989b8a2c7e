//! Auth feature module covering password and face login, the cached user
//! record, and route access decisions. Bearer tokens live in durable storage
//! under `user_token` and are read by the gateway on every request; this module
//! must never log them.

pub mod client;
pub mod guards;
pub mod store;
pub mod types;

pub use store::AuthStore;
