//! Shared frontend utilities for API access, configuration, storage, errors,
//! logging, and build metadata.
//!
//! ## Request Flow
//!
//! 1. **Attach:** [`api::Gateway`] adds `Session-Token` and
//!    `Authorization: Bearer` headers to every request.
//! 2. **Send:** a [`transport::Transport`] performs the request; in the browser
//!    this is `fetch` with an abort timeout.
//! 3. **Translate:** a 401 becomes [`api::SessionSignal::Expired`] and a 404
//!    whose detail says the session is missing becomes
//!    [`api::SessionSignal::Cleaned`]. The error is still returned to the caller.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. Tokens pass through here, so
//! callers must never log request headers.

pub mod api;
pub mod build_info;
pub mod config;
pub mod errors;
pub mod notify;
pub mod storage;
pub mod telemetry;
pub mod transport;

pub use api::{Gateway, SessionSignal};
pub use errors::AppError;
