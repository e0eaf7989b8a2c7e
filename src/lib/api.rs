//! HTTP gateway for the face API. Every request goes through [`Gateway`], which
//! attaches the session token and bearer auth token, decodes JSON, and turns
//! session-related HTTP failures into [`SessionSignal`]s for the session
//! manager. The gateway never stores credentials itself; it asks its
//! [`Credentials`] source on every request.

use super::{
    errors::AppError,
    transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport, UploadPayload},
};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use std::rc::Rc;
use tracing::debug;

pub const SESSION_HEADER: &str = "Session-Token";
pub const AUTH_HEADER: &str = "Authorization";

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
/// Server details that mean the session record itself is gone.
const SESSION_MISSING_PATTERN: &str =
    "セッションが存在しません|セッションが存在しないか期限切れです";

/// Session lifecycle events derived from HTTP responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    /// 401: the auth credential is no longer accepted.
    Expired,
    /// 404 with a session-missing detail: the server dropped the session record.
    Cleaned,
}

pub type SignalSender = UnboundedSender<SessionSignal>;
pub type SignalReceiver = UnboundedReceiver<SessionSignal>;

pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    unbounded()
}

/// Supplies the credentials attached to each outgoing request.
pub trait Credentials {
    fn session_token(&self) -> Option<String>;
    fn auth_token(&self) -> Option<String>;
}

pub struct Gateway<T> {
    transport: T,
    base_url: String,
    credentials: Rc<dyn Credentials>,
    signals: SignalSender,
}

impl<T: Transport> Gateway<T> {
    pub fn new(
        transport: T,
        base_url: &str,
        credentials: Rc<dyn Credentials>,
        signals: SignalSender,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            credentials,
            signals,
        }
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        self.execute(Method::Get, path, RequestBody::Empty).await
    }

    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        self.execute(Method::Post, path, RequestBody::Empty).await
    }

    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AppError> {
        let payload = serde_json::to_string(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        self.execute(Method::Post, path, RequestBody::Json(payload))
            .await
    }

    /// Posts `application/x-www-form-urlencoded` fields, as OAuth2 password login expects.
    pub async fn post_form<R: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<R, AppError> {
        let payload = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.execute(Method::Post, path, RequestBody::Form(payload))
            .await
    }

    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        upload: UploadPayload,
    ) -> Result<R, AppError> {
        self.execute(Method::Post, path, RequestBody::Multipart(upload))
            .await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<R, AppError> {
        let request = ApiRequest {
            method,
            url: build_url_with_base(&self.base_url, path),
            headers: self.credential_headers(),
            body,
        };
        debug!(?method, path, "sending api request");

        let response = self.transport.send(request).await?;
        self.handle_json_response(response)
    }

    /// Both headers are always present; missing tokens are sent empty and the
    /// server decides whether to reject.
    fn credential_headers(&self) -> Vec<(String, String)> {
        let session = self.credentials.session_token().unwrap_or_default();
        let auth = self.credentials.auth_token().unwrap_or_default();
        vec![
            (SESSION_HEADER.to_string(), session),
            (AUTH_HEADER.to_string(), format!("Bearer {auth}")),
        ]
    }

    fn handle_json_response<R: DeserializeOwned>(
        &self,
        response: ApiResponse,
    ) -> Result<R, AppError> {
        if response.ok() {
            return serde_json::from_str::<R>(&response.body)
                .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")));
        }

        let message = error_message(&response.body);
        self.translate_status(response.status, &message);
        Err(AppError::Http {
            status: response.status,
            message,
        })
    }

    fn translate_status(&self, status: u16, detail: &str) {
        let signal = match status {
            401 => SessionSignal::Expired,
            404 if is_session_missing(detail) => SessionSignal::Cleaned,
            _ => return,
        };
        debug!(?signal, status, "emitting session signal");
        if self.signals.unbounded_send(signal).is_err() {
            debug!("session signal listener is gone");
        }
    }
}

/// Returns true when a server detail says the session does not exist or expired.
pub fn is_session_missing(detail: &str) -> bool {
    Regex::new(SESSION_MISSING_PATTERN).is_ok_and(|regex| regex.is_match(detail))
}

/// Builds a URL from an explicit base URL and the provided path.
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Prefers the JSON `detail` field of an error body, then the sanitized body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| sanitize_body(body))
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
