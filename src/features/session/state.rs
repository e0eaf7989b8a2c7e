//! The in-memory session state shared by the manager (writer) and the gateway
//! credentials (reader). Only the session manager mutates it.

use crate::features::session::types::SessionToken;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Validating,
    Creating,
    Active,
    Failed,
}

#[derive(Default)]
struct SessionCell {
    token: RefCell<Option<SessionToken>>,
    phase: Cell<SessionPhase>,
}

/// Cloneable handle to the single session state instance.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Rc<SessionCell>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.inner.token.borrow().clone()
    }

    /// True when a non-empty token is held in memory; no server round-trip.
    pub fn is_set(&self) -> bool {
        self.inner
            .token
            .borrow()
            .as_ref()
            .is_some_and(|token| !token.expose().is_empty())
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.phase.get()
    }

    pub(crate) fn set_token(&self, token: SessionToken) {
        self.inner.token.replace(Some(token));
    }

    pub(crate) fn clear_token(&self) {
        self.inner.token.replace(None);
    }

    pub(crate) fn set_phase(&self, phase: SessionPhase) {
        self.inner.phase.set(phase);
    }
}
