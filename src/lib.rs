//! Browser front-end for face verification. The session, auth, and face cores
//! compile on every target; the Leptos UI is only built for `wasm32`.

#[path = "lib/mod.rs"]
pub mod app_lib;
pub mod features;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod routes;

#[cfg(test)]
mod test_support;

/// Installs logging and mounts the application on `<body>`.
#[cfg(target_arch = "wasm32")]
pub fn start() {
    use app_lib::{config::AppConfig, telemetry};

    telemetry::init(telemetry::parse_level(&AppConfig::load().log_level));
    tracing::info!(
        version = app_lib::build_info::version(),
        commit = app_lib::build_info::git_commit_hash(),
        "starting facegate"
    );
    leptos::prelude::mount_to_body(app::App);
}
