//! Signup route. Inputs are validated locally for early feedback; the server
//! remains the authority on uniqueness and password rules.

use crate::{
    app::use_app,
    app_lib::{AppError, notify::Notice},
    components::{Alert, AlertKind, AppShell, Button, Spinner},
    features::auth::{client, guards::paths, types::SignupRequest},
};
use leptos::{ev::SubmitEvent, prelude::*};
use leptos_router::hooks::use_navigate;

const MIN_PASSWORD_LENGTH: usize = 8;
const INPUT_CLASS: &str = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500";

fn validate(request: &SignupRequest, confirm: &str) -> Result<(), AppError> {
    if request.username.is_empty() || request.email.is_empty() {
        return Err(AppError::Config(
            "Username and email are required.".to_string(),
        ));
    }
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Config(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    if request.password != confirm {
        return Err(AppError::Config("Passwords do not match.".to_string()));
    }
    Ok(())
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let app = use_app();
    let navigate = use_navigate();
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (error, set_error) = signal::<Option<AppError>>(None);

    let signup_action = Action::new_local(move |request: &SignupRequest| {
        let request = request.clone();
        let ctx = app.get_value();
        async move { client::signup(&ctx.gateway, &request).await }
    });

    Effect::new(move |_| {
        if let Some(result) = signup_action.value().get() {
            match result {
                Ok(user) => {
                    app.get_value().notices.push(Notice::success(
                        "Account created",
                        format!("{} can now sign in.", user.username),
                    ));
                    navigate(paths::LOGIN, Default::default());
                }
                Err(err) => set_error.set(Some(err)),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);

        let full_name_value = full_name.get_untracked().trim().to_string();
        let request = SignupRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            full_name: (!full_name_value.is_empty()).then_some(full_name_value),
        };
        if let Err(err) = validate(&request, &confirm_password.get_untracked()) {
            set_error.set(Some(err));
            return;
        }

        signup_action.dispatch(request);
    };

    view! {
        <AppShell>
            <form class="max-w-sm mx-auto" on:submit=on_submit>
                <div class="mb-5">
                    <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for="username">
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
                    <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for="email">
                        "Email"
                    </label>
                    <input
                        id="email"
                        type="email"
                        class=INPUT_CLASS
                        autocomplete="email"
                        required
                        on:input=move |event| set_email.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for="full-name">
                        "Full name (optional)"
                    </label>
                    <input
                        id="full-name"
                        type="text"
                        class=INPUT_CLASS
                        autocomplete="name"
                        on:input=move |event| set_full_name.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for="password">
                        "Password"
                    </label>
                    <input
                        id="password"
                        type="password"
                        class=INPUT_CLASS
                        autocomplete="new-password"
                        required
                        on:input=move |event| set_password.set(event_target_value(&event))
                    />
                </div>
                <div class="mb-5">
                    <label class="block mb-2 text-sm font-medium text-gray-900 dark:text-white" for="confirm-password">
                        "Confirm password"
                    </label>
                    <input
                        id="confirm-password"
                        type="password"
                        class=INPUT_CLASS
                        autocomplete="new-password"
                        required
                        on:input=move |event| set_confirm_password.set(event_target_value(&event))
                    />
                </div>
                <Button button_type="submit" disabled=signup_action.pending()>
                    "Create account"
                </Button>
                {move || {
                    signup_action
                        .pending()
                        .get()
                        .then_some(view! { <div class="mt-4"><Spinner /></div> })
                }}
                {move || {
                    error
                        .get()
                        .map(|err| view! {
                            <div class="mt-4">
                                <Alert kind=AlertKind::Error message=err.to_string() />
                            </div>
                        })
                }}
            </form>
        </AppShell>
    }
}
