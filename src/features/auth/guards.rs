//! Navigation guard decisions. Every route carries a [`RouteAccess`]; before a
//! navigation the guard compares it with a snapshot of the cached auth state.
//! This is a UX-only guard; real access control lives on the API.

use crate::{app_lib::notify::Notice, features::auth::store::AuthStore};

pub mod paths {
    pub const ROOT: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const ADMIN: &str = "/admin";
    pub const USER: &str = "/user";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteAccess {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteAccess {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_admin: false,
    };
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };
}

/// Access policy for each entry in the route table; unknown paths are public.
pub fn route_access(path: &str) -> RouteAccess {
    match path.trim_end_matches('/') {
        "" | paths::USER => RouteAccess::AUTHENTICATED,
        paths::ADMIN => RouteAccess::ADMIN,
        _ => RouteAccess::PUBLIC,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub has_token: bool,
    pub is_admin: bool,
}

impl AuthSnapshot {
    pub fn from_store(store: &AuthStore) -> Self {
        Self {
            has_token: store.is_authenticated(),
            is_admin: store.user_info().is_admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect { to: &'static str, notice: Notice },
}

pub fn evaluate(access: RouteAccess, auth: AuthSnapshot) -> GuardDecision {
    if !access.requires_auth {
        return GuardDecision::Proceed;
    }
    if !auth.has_token {
        return GuardDecision::Redirect {
            to: paths::LOGIN,
            notice: Notice::warning("Sign in required", "Please sign in first."),
        };
    }
    if access.requires_admin && !auth.is_admin {
        return GuardDecision::Redirect {
            to: paths::USER,
            notice: Notice::error("Access denied", "Administrator privileges are required."),
        };
    }
    GuardDecision::Proceed
}

#[cfg(target_arch = "wasm32")]
pub use component::RequireAccess;

#[cfg(target_arch = "wasm32")]
mod component {
    use super::{AuthSnapshot, GuardDecision, RouteAccess, evaluate};
    use crate::app::use_app;
    use leptos::prelude::*;
    use leptos_router::hooks::use_navigate;
    use tracing::debug;

    /// Renders `children` only when the cached auth state satisfies `access`.
    #[component]
    pub fn RequireAccess(access: RouteAccess, children: ChildrenFn) -> impl IntoView {
        let app = use_app();
        let navigate = use_navigate();
        let allowed = RwSignal::new(false);

        Effect::new(move |_| {
            let ctx = app.get_value();
            // Re-run whenever the auth state changes (login, logout, expiry).
            let _ = ctx.auth_version.get();
            let snapshot = AuthSnapshot::from_store(&ctx.auth);
            match evaluate(access, snapshot) {
                GuardDecision::Proceed => allowed.set(true),
                GuardDecision::Redirect { to, notice } => {
                    debug!(to, "guard redirect");
                    allowed.set(false);
                    ctx.notices.push(notice);
                    navigate(to, Default::default());
                }
            }
        });

        move || allowed.get().then(|| children())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::notify::NoticeLevel;

    fn signed_in(is_admin: bool) -> AuthSnapshot {
        AuthSnapshot {
            has_token: true,
            is_admin,
        }
    }

    #[test]
    fn public_routes_always_proceed() {
        assert_eq!(
            evaluate(route_access(paths::LOGIN), AuthSnapshot::default()),
            GuardDecision::Proceed
        );
        assert_eq!(
            evaluate(route_access(paths::SIGNUP), signed_in(false)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn missing_token_redirects_to_login_with_warning() {
        for path in [paths::ROOT, paths::USER, paths::ADMIN] {
            match evaluate(route_access(path), AuthSnapshot::default()) {
                GuardDecision::Redirect { to, notice } => {
                    assert_eq!(to, paths::LOGIN);
                    assert_eq!(notice.level, NoticeLevel::Warning);
                }
                GuardDecision::Proceed => panic!("{path} should require auth"),
            }
        }
    }

    #[test]
    fn admin_route_requires_admin_flag() {
        match evaluate(route_access(paths::ADMIN), signed_in(false)) {
            GuardDecision::Redirect { to, notice } => {
                assert_eq!(to, paths::USER);
                assert_eq!(notice.level, NoticeLevel::Error);
            }
            GuardDecision::Proceed => panic!("non-admin must not reach /admin"),
        }
        assert_eq!(
            evaluate(route_access(paths::ADMIN), signed_in(true)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn authenticated_route_ignores_admin_flag() {
        assert_eq!(
            evaluate(route_access(paths::USER), signed_in(false)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn snapshot_reads_cached_admin_flag() {
        use crate::app_lib::storage::{ClientStorage, MemoryStorage, USER_INFO_KEY, USER_TOKEN_KEY};
        use std::rc::Rc;

        let storage = Rc::new(MemoryStorage::new());
        storage.set(USER_TOKEN_KEY, "jwt").unwrap();
        storage.set(USER_INFO_KEY, r#"{"is_admin":false}"#).unwrap();
        let store = AuthStore::new(storage.clone());

        let snapshot = AuthSnapshot::from_store(&store);
        assert!(matches!(
            evaluate(route_access(paths::ADMIN), snapshot),
            GuardDecision::Redirect { to: paths::USER, .. }
        ));

        storage.set(USER_INFO_KEY, r#"{"is_admin":true}"#).unwrap();
        assert_eq!(
            evaluate(route_access(paths::ADMIN), AuthSnapshot::from_store(&store)),
            GuardDecision::Proceed
        );
    }
}
