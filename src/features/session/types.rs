//! Session endpoint payloads. Tokens are wrapped as soon as they are decoded.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{fmt, rc::Rc};

#[derive(Debug, Deserialize)]
pub struct SessionCreateResponse {
    pub code: i64,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionInfoResponse {
    pub code: i64,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub remaining_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SessionCurrentResponse {
    pub code: i64,
}

/// Opaque server-issued session identifier. `Debug` output is redacted.
#[derive(Clone)]
pub struct SessionToken(Rc<SecretString>);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Rc::new(SecretString::from(value.into())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SessionToken([REDACTED])")
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

/// Outcome of a successful session creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub expires_in_seconds: u64,
}

impl SessionGrant {
    pub fn expires_in_minutes(&self) -> u64 {
        self.expires_in_seconds / 60
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionInit {
    pub initialized: bool,
    /// True when the stored token was still valid and no new session was created.
    pub reused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistingSession {
    pub has_session: bool,
    pub error: Option<String>,
}
