//! Header badge for the session handshake. Once it failed, the badge offers a
//! retry and a check for a session this address already holds.

use crate::{app::use_app, features::session::SessionPhase};
use leptos::{prelude::*, task::spawn_local};
use tracing::{debug, warn};

#[component]
pub fn SessionStatus() -> impl IntoView {
    let app = use_app();
    let phase = app.get_value().phase;
    let retrying = RwSignal::new(false);
    let checking = RwSignal::new(false);

    let retry = move |_| {
        if retrying.get_untracked() {
            return;
        }
        retrying.set(true);
        let ctx = app.get_value();
        spawn_local(async move {
            ctx.phase.set(SessionPhase::Creating);
            if let Err(err) = ctx.session.retry_create_session().await {
                warn!("session retry failed: {err}");
            }
            ctx.refresh();
            retrying.set(false);
        });
    };

    // The server reports 409 when this address already holds a session.
    let check = move |_| {
        if checking.get_untracked() {
            return;
        }
        checking.set(true);
        let ctx = app.get_value();
        spawn_local(async move {
            let existing = ctx.session.check_existing_session().await;
            debug!(has_session = existing.has_session, "existing session check finished");
            checking.set(false);
        });
    };

    move || {
        let (label, class) = match phase.get() {
            SessionPhase::Active => ("Session active", "text-emerald-700 dark:text-emerald-300"),
            SessionPhase::Validating | SessionPhase::Creating => {
                ("Connecting…", "text-gray-500 dark:text-gray-400")
            }
            SessionPhase::Uninitialized => ("No session", "text-gray-500 dark:text-gray-400"),
            SessionPhase::Failed => ("Session unavailable", "text-red-700 dark:text-red-300"),
        };
        let failed = phase.get() == SessionPhase::Failed;

        view! {
            <span class=format!("inline-flex items-center gap-2 text-xs {class}")>
                {label}
                {failed.then(|| view! {
                    <button
                        type="button"
                        class="underline hover:no-underline"
                        disabled=move || retrying.get()
                        on:click=retry
                    >
                        "Retry"
                    </button>
                    <button
                        type="button"
                        class="underline hover:no-underline"
                        disabled=move || checking.get()
                        on:click=check
                    >
                        "Check existing"
                    </button>
                })}
            </span>
        }
    }
}
