//! Session feature: the short-lived server session that every API request
//! carries in the `Session-Token` header, independent of the user's bearer
//! token. [`assemble`] wires the single session state, the gateway that reads
//! it, and the manager that owns it.

pub mod manager;
pub mod state;
pub mod types;

pub use manager::SessionManager;
pub use state::{SessionHandle, SessionPhase};

use crate::{
    app_lib::{
        Gateway,
        api::{Credentials, SignalReceiver, signal_channel},
        notify::{Navigator, Notifier},
        storage::ClientStorage,
        transport::Transport,
    },
    features::auth::AuthStore,
};
use std::rc::Rc;

/// Reads the in-memory session token and the stored auth token for the gateway.
pub struct SessionCredentials {
    state: SessionHandle,
    auth: AuthStore,
}

impl SessionCredentials {
    pub fn new(state: SessionHandle, auth: AuthStore) -> Self {
        Self { state, auth }
    }
}

impl Credentials for SessionCredentials {
    fn session_token(&self) -> Option<String> {
        self.state.token().map(|token| token.expose().to_string())
    }

    fn auth_token(&self) -> Option<String> {
        self.auth.auth_token()
    }
}

pub struct SessionRuntime<T> {
    pub manager: SessionManager<T>,
    pub gateway: Rc<Gateway<T>>,
    pub auth: AuthStore,
    /// Feed this to [`SessionManager::listen`].
    pub signals: SignalReceiver,
}

pub fn assemble<T: Transport + 'static>(
    transport: T,
    base_url: &str,
    storage: Rc<dyn ClientStorage>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
) -> SessionRuntime<T> {
    let state = SessionHandle::new();
    let auth = AuthStore::new(Rc::clone(&storage));
    let (sender, signals) = signal_channel();
    let credentials = Rc::new(SessionCredentials::new(state.clone(), auth.clone()));
    let gateway = Rc::new(Gateway::new(transport, base_url, credentials, sender));
    let manager = SessionManager::new(Rc::clone(&gateway), state, storage, notifier, navigator);

    SessionRuntime {
        manager,
        gateway,
        auth,
        signals,
    }
}
