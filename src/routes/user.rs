//! Signed-in landing page: profile summary, session status, and a face
//! verification check against the enrolled identity.

use crate::{
    app::use_app,
    app_lib::notify::Notice,
    components::{AppShell, CameraPanel},
    features::{
        auth::guards::{RequireAccess, paths, route_access},
        face::types::VerificationResponse,
    },
};
use leptos::prelude::*;

#[component]
pub fn UserPage() -> impl IntoView {
    let app = use_app();

    let profile = Signal::derive(move || {
        let ctx = app.get_value();
        let _ = ctx.auth_version.get();
        ctx.auth.user_info()
    });
    let expires_hint = move || {
        if app.get_value().session.has_valid_session() {
            "Your session is active."
        } else {
            "No active session. Requests will fail until a new session is created."
        }
    };

    let on_verified = move |response: VerificationResponse| {
        let notices = app.get_value().notices;
        if response.recognized {
            notices.push(Notice::success("Face verified", response.message));
        } else {
            notices.push(Notice::warning("Face not recognized", response.message));
        }
    };

    view! {
        <AppShell>
            <RequireAccess access=route_access(paths::USER)>
                <div class="space-y-6">
                    <div class="space-y-1">
                        <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                            {move || format!("Hello, {}", profile.get().username)}
                        </h1>
                        <p class="text-sm text-gray-500 dark:text-gray-400">
                            {move || {
                                let _ = app.get_value().phase.get();
                                expires_hint()
                            }}
                        </p>
                        <Show when=move || profile.get().is_admin>
                            <p class="text-sm text-blue-700 dark:text-blue-300">"Administrator"</p>
                        </Show>
                    </div>
                    <div class="max-w-xl">
                        <h2 class="mb-3 text-lg font-medium text-gray-900 dark:text-white">
                            "Verify your face"
                        </h2>
                        <CameraPanel on_verified=on_verified />
                    </div>
                </div>
            </RequireAccess>
        </AppShell>
    }
}
