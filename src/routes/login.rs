//! Sign-in page offering password login and face login. Both paths end with a
//! bearer token in storage and the cached profile that the guard reads.

use crate::{
    app::{AppHandle, use_app},
    app_lib::{AppError, notify::Notice},
    components::{Alert, AlertKind, AppShell, Button, CameraPanel, Spinner},
    features::{
        auth::{client, guards::paths, types::UserInfo},
        face::types::VerificationResponse,
    },
};
use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use leptos_router::hooks::use_navigate;

const INPUT_CLASS: &str = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500";

#[derive(Clone)]
struct LoginInput {
    username: String,
    password: String,
}

fn landing_path(profile: &UserInfo) -> &'static str {
    if profile.is_admin {
        paths::ADMIN
    } else {
        paths::USER
    }
}

fn signed_in(app: AppHandle, profile: &UserInfo) {
    let ctx = app.get_value();
    ctx.refresh();
    ctx.notices.push(Notice::success(
        "Signed in",
        format!("Welcome, {}.", profile.username),
    ));
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();
    let navigate = use_navigate();
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<AppError>>(None);
    let (use_face, set_use_face) = signal(false);

    let login_action = Action::new_local(move |input: &LoginInput| {
        let input = input.clone();
        let ctx = app.get_value();
        async move { client::login(&ctx.gateway, &ctx.auth, &input.username, &input.password).await }
    });

    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if let Some(result) = login_action.value().get() {
                match result {
                    Ok(profile) => {
                        signed_in(app, &profile);
                        navigate(landing_path(&profile), Default::default());
                    }
                    Err(err) => set_error.set(Some(err)),
                }
            }
        });
    }

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);

        let username_value = username.get_untracked().trim().to_string();
        let password_value = password.get_untracked();
        if username_value.is_empty() || password_value.trim().is_empty() {
            set_error.set(Some(AppError::Config(
                "Username and password are required.".to_string(),
            )));
            return;
        }

        login_action.dispatch(LoginInput {
            username: username_value,
            password: password_value,
        });
    };

    let face_login = move |response: VerificationResponse| {
        let ctx = app.get_value();
        let Some(token) = response.issued_token().map(str::to_string) else {
            let message = if response.message.trim().is_empty() {
                "Your face was not recognized. Please try again.".to_string()
            } else {
                response.message.clone()
            };
            ctx.notices.push(Notice::warning("Face not recognized", message));
            return;
        };

        let navigate = navigate.clone();
        spawn_local(async move {
            match client::adopt_token(&ctx.gateway, &ctx.auth, &token).await {
                Ok(profile) => {
                    signed_in(app, &profile);
                    navigate(landing_path(&profile), Default::default());
                }
                Err(err) => set_error.set(Some(err)),
            }
        });
    };
    // Keeps the router handle out of the `Send` bound on `Show` children.
    let face_login = StoredValue::new_local(face_login);

    view! {
        <AppShell>
            <div class="max-w-md mx-auto space-y-6">
                <div class="flex gap-4 border-b border-gray-200 dark:border-gray-700 text-sm font-medium">
                    <button
                        type="button"
                        class="pb-2"
                        class:border-b-2=move || !use_face.get()
                        class:border-blue-600=move || !use_face.get()
                        on:click=move |_| set_use_face.set(false)
                    >
                        "Password"
                    </button>
                    <button
                        type="button"
                        class="pb-2"
                        class:border-b-2=move || use_face.get()
                        class:border-blue-600=move || use_face.get()
                        on:click=move |_| set_use_face.set(true)
                    >
                        "Face"
                    </button>
                </div>

                <Show
                    when=move || use_face.get()
                    fallback=move || view! {
                        <form on:submit=on_submit>
                            <div class="mb-5">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="username"
                                >
                                    "Username"
                                </label>
                                <input
                                    id="username"
                                    type="text"
                                    class=INPUT_CLASS
                                    autocomplete="username"
                                    required
                                    on:input=move |event| set_username.set(event_target_value(&event))
                                />
                            </div>
                            <div class="mb-5">
                                <label
                                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                    for="password"
                                >
                                    "Password"
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    class=INPUT_CLASS
                                    autocomplete="current-password"
                                    required
                                    on:input=move |event| set_password.set(event_target_value(&event))
                                />
                            </div>
                            <Button button_type="submit" disabled=login_action.pending()>
                                "Sign In"
                            </Button>
                            {move || {
                                login_action
                                    .pending()
                                    .get()
                                    .then_some(view! { <div class="mt-4"><Spinner /></div> })
                            }}
                        </form>
                    }
                >
                    <CameraPanel
                        on_verified=move |response: VerificationResponse| face_login.with_value(|handler| handler(response))
                        submit_label="Sign in with face"
                    />
                </Show>

                {move || {
                    error
                        .get()
                        .map(|err| view! { <Alert kind=AlertKind::Error message=err.to_string() /> })
                }}
            </div>
        </AppShell>
    }
}
