//! Layout components shared across routes.

mod app_shell;
mod session_status;

pub(crate) use app_shell::AppShell;
pub(crate) use session_status::SessionStatus;
