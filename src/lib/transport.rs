//! Wire-level request/response types and the transport seam used by the
//! gateway. The browser implementation sends through `fetch` with an abort
//! timeout; tests substitute a scripted transport.

use super::errors::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A single file field of a multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPayload {
    pub field: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Form(String),
    Multipart(UploadPayload),
}

#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// Returns the first header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw status and body.
///
/// Implementations only fail for transport problems (network, timeout,
/// request construction); HTTP error statuses are returned as responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}

/// Maps transport error text into `Timeout` or `Network`.
pub(crate) fn classify_transport_error(message: &str) -> AppError {
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {message}"))
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::FetchTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{ApiRequest, ApiResponse, Method, RequestBody, Transport, UploadPayload, classify_transport_error};
    use crate::app_lib::errors::AppError;
    use gloo_net::http::{Request, RequestBuilder};
    use gloo_timers::callback::Timeout;
    use web_sys::{AbortController, AbortSignal, Blob, BlobPropertyBag, FormData};

    /// `fetch`-backed transport with a fixed abort timeout.
    #[derive(Clone, Debug)]
    pub struct FetchTransport {
        timeout_ms: u32,
    }

    impl FetchTransport {
        pub fn new(timeout_ms: u32) -> Self {
            Self { timeout_ms }
        }
    }

    impl Transport for FetchTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
            let controller = AbortController::new().map_err(|_| {
                AppError::Config("Failed to initialize request timeout.".to_string())
            })?;
            let signal = controller.signal();
            let timeout_controller = controller.clone();
            let _timeout = Timeout::new(self.timeout_ms, move || timeout_controller.abort());

            let built = build_request(request, &signal)?;
            let response = built
                .send()
                .await
                .map_err(|err| classify_transport_error(&err.to_string()))?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(ApiResponse { status, body })
        }
    }

    fn build_request(request: ApiRequest, signal: &AbortSignal) -> Result<Request, AppError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        }
        .abort_signal(Some(signal));

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        attach_body(builder, request.body)
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    }

    fn attach_body(builder: RequestBuilder, body: RequestBody) -> Result<Request, String> {
        match body {
            RequestBody::Empty => builder.build().map_err(|err| err.to_string()),
            RequestBody::Json(payload) => builder
                .header("Content-Type", "application/json")
                .body(payload)
                .map_err(|err| err.to_string()),
            RequestBody::Form(payload) => builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(payload)
                .map_err(|err| err.to_string()),
            // The browser sets the multipart boundary header itself.
            RequestBody::Multipart(upload) => builder
                .body(multipart_form(&upload)?)
                .map_err(|err| err.to_string()),
        }
    }

    fn multipart_form(upload: &UploadPayload) -> Result<FormData, String> {
        let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&upload.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| "failed to create image blob".to_string())?;

        let form = FormData::new().map_err(|_| "failed to create form data".to_string())?;
        form.append_with_blob_and_filename(&upload.field, &blob, &upload.filename)
            .map_err(|_| "failed to append image field".to_string())?;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRequest, ApiResponse, Method, RequestBody, classify_transport_error};
    use crate::app_lib::errors::AppError;

    #[test]
    fn classify_transport_error_detects_abort() {
        assert!(matches!(
            classify_transport_error("The operation was aborted."),
            AppError::Timeout(_)
        ));
        assert!(matches!(
            classify_transport_error("Failed to fetch"),
            AppError::Network(_)
        ));
    }

    #[test]
    fn response_ok_covers_2xx_only() {
        assert!(ApiResponse::new(200, "").ok());
        assert!(ApiResponse::new(204, "").ok());
        assert!(!ApiResponse::new(401, "").ok());
        assert!(!ApiResponse::new(302, "").ok());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = ApiRequest {
            method: Method::Get,
            url: "/api".to_string(),
            headers: vec![("Session-Token".to_string(), "abc".to_string())],
            body: RequestBody::Empty,
        };
        assert_eq!(request.header("session-token"), Some("abc"));
        assert_eq!(request.header("Authorization"), None);
    }
}
