//! Application root. Builds the single session runtime, starts the signal
//! listener and the initial session handshake, then renders the router.

use crate::{
    app_lib::{
        Gateway,
        api::SignalReceiver,
        config::AppConfig,
        notify::LocationNavigator,
        storage::default_storage,
        transport::FetchTransport,
    },
    components::{NoticeCenter, NoticeStack},
    features::{
        auth::AuthStore,
        face::detector::FaceApi,
        session::{self, SessionManager, SessionPhase},
    },
    routes::AppRoutes,
};
use leptos::{prelude::*, task::spawn_local};
use leptos_router::components::Router;
use std::rc::Rc;
use tracing::warn;

/// Shared handles for routes and components. Reactive state lives in the
/// signals; everything else is plain shared ownership.
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub session: SessionManager<FetchTransport>,
    pub gateway: Rc<Gateway<FetchTransport>>,
    pub auth: AuthStore,
    pub face: Rc<FaceApi>,
    pub notices: NoticeCenter,
    /// Bumped whenever stored auth state may have changed.
    pub auth_version: RwSignal<u32>,
    pub phase: RwSignal<SessionPhase>,
}

impl AppContext {
    /// Re-reads non-reactive state into the signals.
    pub fn refresh(&self) {
        self.phase.set(self.session.phase());
        self.auth_version.update(|version| *version = version.wrapping_add(1));
    }
}

pub type AppHandle = StoredValue<AppContext, LocalStorage>;

fn build_context() -> (AppContext, SignalReceiver) {
    let config = AppConfig::load();
    let notices = NoticeCenter::new();
    let runtime = session::assemble(
        FetchTransport::new(config.request_timeout_ms),
        &config.api_base_url,
        default_storage(),
        Rc::new(notices),
        Rc::new(LocationNavigator),
    );

    let context = AppContext {
        config: Rc::new(config),
        phase: RwSignal::new(runtime.manager.phase()),
        session: runtime.manager,
        gateway: runtime.gateway,
        auth: runtime.auth,
        face: Rc::new(FaceApi::new()),
        notices,
        auth_version: RwSignal::new(0),
    };
    (context, runtime.signals)
}

/// Returns the application context provided by [`App`].
pub fn use_app() -> AppHandle {
    expect_context::<AppHandle>()
}

#[component]
pub fn App() -> impl IntoView {
    let (context, signals) = build_context();
    provide_context(StoredValue::new_local(context.clone()));

    let manager = context.session.clone();
    let listener = context.clone();
    spawn_local(manager.listen(signals, move |_| listener.refresh()));

    spawn_local(async move {
        context.phase.set(if context.session.has_stored_token() {
            SessionPhase::Validating
        } else {
            SessionPhase::Creating
        });
        if let Err(err) = context.session.initialize_session().await {
            warn!("session initialization failed: {err}");
        }
        context.refresh();
    });

    view! {
        <Router>
            <AppRoutes />
        </Router>
        <NoticeStack />
    }
}
