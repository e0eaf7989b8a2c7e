//! Route table. Every guarded page is wrapped in [`RequireAccess`] with the
//! policy from [`route_access`], so the table and the guard cannot disagree.

mod admin;
mod login;
mod not_found;
mod signup;
mod user;

pub(crate) use admin::AdminPage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;
pub(crate) use signup::SignUpPage;
pub(crate) use user::UserPage;

use crate::features::auth::guards::{RequireAccess, paths, route_access};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Routes};
use leptos_router::path;

#[component]
fn HomeRedirect() -> impl IntoView {
    view! {
        <RequireAccess access=route_access(paths::ROOT)>
            <Redirect path=paths::USER />
        </RequireAccess>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=HomeRedirect />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/signup") view=SignUpPage />
            <Route path=path!("/user") view=UserPage />
            <Route path=path!("/admin") view=AdminPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
