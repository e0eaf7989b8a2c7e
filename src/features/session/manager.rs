//! Session lifecycle: create, validate, initialize, retry, reinitialize, and
//! teardown of the short-lived session token that every API call carries.
//!
//! At most one `POST /session/create` is outstanding at a time. The first
//! caller starts the request and parks a shared handle to it; later callers
//! await the same handle and observe the identical outcome. The handle is
//! cleared by the request itself once it resolves.

use crate::{
    app_lib::{
        AppError, Gateway, SessionSignal,
        api::SignalReceiver,
        notify::{Navigator, Notice, Notifier},
        storage::{ClientStorage, SESSION_TOKEN_KEY},
        transport::Transport,
    },
    features::{
        auth::AuthStore,
        session::{
            state::{SessionHandle, SessionPhase},
            types::{
                ExistingSession, SessionCreateResponse, SessionCurrentResponse, SessionGrant,
                SessionInfoResponse, SessionInit, SessionToken,
            },
        },
    },
};
use futures::{
    FutureExt, StreamExt,
    future::{LocalBoxFuture, Shared},
};
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, info, warn};

pub const CREATE_PATH: &str = "/api/v1/session/create";
pub const INFO_PATH: &str = "/api/v1/session/info";
pub const CURRENT_PATH: &str = "/api/v1/session/current";
/// Where expiry and teardown send the browser.
pub const HOME_PATH: &str = "/";

type PendingCreate = Shared<LocalBoxFuture<'static, Result<SessionGrant, AppError>>>;

pub struct SessionManager<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for SessionManager<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    gateway: Rc<Gateway<T>>,
    state: SessionHandle,
    storage: Rc<dyn ClientStorage>,
    auth: AuthStore,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    pending: RefCell<Option<PendingCreate>>,
}

impl<T: Transport + 'static> SessionManager<T> {
    pub fn new(
        gateway: Rc<Gateway<T>>,
        state: SessionHandle,
        storage: Rc<dyn ClientStorage>,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let auth = AuthStore::new(Rc::clone(&storage));
        Self {
            inner: Rc::new(Inner {
                gateway,
                state,
                storage,
                auth,
                notifier,
                navigator,
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> &SessionHandle {
        &self.inner.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.phase()
    }

    /// Requests a new session, joining the in-flight request if one exists.
    pub async fn create_session(&self) -> Result<SessionGrant, AppError> {
        let pending = self.pending_or_start();
        pending.await
    }

    fn pending_or_start(&self) -> PendingCreate {
        let mut slot = self.inner.pending.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            debug!("session creation in flight, joining it");
            return pending.clone();
        }

        let inner = Rc::clone(&self.inner);
        let pending = async move {
            let outcome = inner.request_session().await;
            inner.pending.borrow_mut().take();
            outcome
        }
        .boxed_local()
        .shared();
        *slot = Some(pending.clone());
        pending
    }

    /// Asks the server whether the held token is still valid. Fails closed.
    pub async fn validate_stored_session(&self) -> bool {
        match self
            .inner
            .gateway
            .get_json::<SessionInfoResponse>(INFO_PATH)
            .await
        {
            Ok(info) => {
                let valid = info.code == 200 && !info.is_expired;
                debug!(
                    valid,
                    code = info.code,
                    remaining = ?info.remaining_time,
                    "session validation result"
                );
                valid
            }
            Err(err) => {
                debug!("session validation failed: {err}");
                false
            }
        }
    }

    /// Reuses a stored token when the server still accepts it, otherwise
    /// discards it and creates a new session.
    pub async fn initialize_session(&self) -> Result<SessionInit, AppError> {
        let stored = self.inner.stored_token();
        info!(stored = stored.is_some(), "initializing session");

        if let Some(stored) = stored {
            self.inner.state.set_token(SessionToken::new(stored));
            self.inner.state.set_phase(SessionPhase::Validating);
            if self.validate_stored_session().await {
                self.inner.state.set_phase(SessionPhase::Active);
                info!("stored session is valid");
                return Ok(SessionInit {
                    initialized: true,
                    reused: true,
                });
            }
            info!("stored session is invalid, discarding it");
            self.inner.discard_token();
        }

        self.create_session().await?;
        self.inner
            .notifier
            .notify(Notice::success("Welcome", "Session ready."));
        Ok(SessionInit {
            initialized: true,
            reused: false,
        })
    }

    /// Discards the current token unconditionally and initializes again.
    pub async fn retry_create_session(&self) -> Result<SessionInit, AppError> {
        info!("retrying session creation");
        self.inner.discard_token();
        let result = self.initialize_session().await;
        debug!(ok = result.is_ok(), "session retry finished");
        result
    }

    /// Replaces a session the server reported as missing or expired.
    pub async fn reinitialize_session(&self) -> Result<SessionInit, AppError> {
        info!("reinitializing session");
        self.inner.discard_token();
        let result = self.initialize_session().await;

        let notice = match &result {
            Ok(_) => Notice::success("Session renewed", "A new session was created."),
            Err(err) => Notice::error("Session renewal failed", err.detail()),
        };
        self.inner.notifier.notify(notice);
        result
    }

    /// The auth credential was rejected: sign the user out but keep the session.
    pub fn handle_session_expired(&self) {
        info!("auth expired, clearing user credentials");
        self.inner.auth.clear();
        self.inner.notifier.notify(Notice::warning(
            "Session expired",
            "Returning to the home page.",
        ));
        self.inner.navigator.redirect(HOME_PATH);
    }

    /// Clears every credential, session token included.
    pub fn handle_session_deleted(&self) {
        info!("session deleted, clearing all credentials");
        self.inner.discard_token();
        self.inner.state.set_phase(SessionPhase::Uninitialized);
        self.inner.auth.clear();
        self.inner.notifier.notify(Notice::info(
            "Session deleted",
            "Returning to the home page.",
        ));
        self.inner.navigator.redirect(HOME_PATH);
    }

    pub fn has_valid_session(&self) -> bool {
        self.inner.state.is_set()
    }

    /// Whether durable storage holds a token that initialization would validate.
    pub fn has_stored_token(&self) -> bool {
        self.inner.stored_token().is_some()
    }

    /// Asks whether this client address already holds a server-side session.
    pub async fn check_existing_session(&self) -> ExistingSession {
        match self
            .inner
            .gateway
            .get_json::<SessionCurrentResponse>(CURRENT_PATH)
            .await
        {
            Ok(current) if current.code == 200 => {
                self.inner.notifier.notify(Notice::info(
                    "Existing session detected",
                    "Retry after the existing session expires.",
                ));
                ExistingSession {
                    has_session: true,
                    error: None,
                }
            }
            Ok(_) => {
                self.inner.notifier.notify(Notice::info(
                    "No active session",
                    "Try creating the session again.",
                ));
                ExistingSession {
                    has_session: false,
                    error: None,
                }
            }
            Err(err) => {
                self.inner.notifier.notify(Notice::error(
                    "Session check failed",
                    err.detail(),
                ));
                ExistingSession {
                    has_session: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub async fn handle_signal(&self, signal: SessionSignal) {
        debug!(?signal, "handling session signal");
        match signal {
            SessionSignal::Expired => self.handle_session_expired(),
            SessionSignal::Cleaned => {
                let _ = self.reinitialize_session().await;
            }
        }
    }

    /// Consumes gateway signals one at a time until the channel closes,
    /// calling `handled` after each one.
    pub async fn listen<F>(self, mut signals: SignalReceiver, mut handled: F)
    where
        F: FnMut(SessionSignal),
    {
        while let Some(signal) = signals.next().await {
            self.handle_signal(signal).await;
            handled(signal);
        }
        debug!("session signal channel closed");
    }
}

impl<T: Transport> Inner<T> {
    fn stored_token(&self) -> Option<String> {
        self.storage
            .get(SESSION_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    async fn request_session(&self) -> Result<SessionGrant, AppError> {
        self.state.set_phase(SessionPhase::Creating);
        info!("requesting a new session");

        let outcome = self
            .gateway
            .post_empty::<SessionCreateResponse>(CREATE_PATH)
            .await
            .and_then(into_grant);

        match &outcome {
            Ok(grant) => {
                self.store_token(&grant.token);
                self.state.set_phase(SessionPhase::Active);
                info!(expires_in = grant.expires_in_seconds, "session created");
                self.notifier.notify(Notice::success(
                    "Session created",
                    format!("Session expires in {} minutes.", grant.expires_in_minutes()),
                ));
            }
            Err(err) => {
                self.state.set_phase(SessionPhase::Failed);
                warn!("session creation failed: {err}");
                self.notifier
                    .notify(Notice::error("Session creation failed", err.detail()));
            }
        }
        outcome
    }

    fn store_token(&self, token: &SessionToken) {
        self.state.set_token(token.clone());
        if let Err(err) = self.storage.set(SESSION_TOKEN_KEY, token.expose()) {
            warn!("session token kept in memory only: {err}");
        }
    }

    fn discard_token(&self) {
        self.state.clear_token();
        self.storage.remove(SESSION_TOKEN_KEY);
    }
}

fn into_grant(response: SessionCreateResponse) -> Result<SessionGrant, AppError> {
    if response.code == 200 && !response.token.is_empty() {
        return Ok(SessionGrant {
            token: SessionToken::new(response.token),
            expires_in_seconds: response.expires_in,
        });
    }
    Err(AppError::Server {
        code: response.code,
        message: response
            .detail
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| "Failed to create session.".to_string()),
    })
}
