//! Detection and verification payloads.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Axis-aligned face rectangle in source-image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct DetectionBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DetectionBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn scaled(&self, scale_x: f64, scale_y: f64) -> Self {
        Self {
            x: self.x * scale_x,
            y: self.y * scale_y,
            width: self.width * scale_x,
            height: self.height * scale_y,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VerifiedToken {
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: String,
}

/// Verification result as returned by the server. Fields the client does not
/// interpret are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VerificationResponse {
    #[serde(default)]
    pub recognized: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Option<VerifiedToken>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerificationResponse {
    /// The bearer token issued for a recognized face, if any.
    pub fn issued_token(&self) -> Option<&str> {
        if !self.recognized {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|data| data.token.as_deref())
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectionBox, VerificationResponse};

    #[test]
    fn scaled_multiplies_each_axis() {
        let scaled = DetectionBox::new(10.0, 20.0, 30.0, 40.0).scaled(2.0, 0.5);
        assert_eq!(scaled, DetectionBox::new(20.0, 10.0, 60.0, 20.0));
    }

    #[test]
    fn unrecognized_response_issues_no_token() {
        let response: VerificationResponse = serde_json::from_str(
            r#"{"recognized":false,"message":"No face detected in the image","data":{"token":null,"token_type":"Bearer"},"code":400}"#,
        )
        .unwrap();
        assert_eq!(response.issued_token(), None);
        assert_eq!(response.code, Some(400));
    }

    #[test]
    fn recognized_response_keeps_extra_fields() {
        let response: VerificationResponse = serde_json::from_str(
            r#"{"recognized":true,"message":"ok","data":{"token":"jwt","token_type":"Bearer"},"user_id":3}"#,
        )
        .unwrap();
        assert_eq!(response.issued_token(), Some("jwt"));
        assert_eq!(response.extra.get("user_id"), Some(&serde_json::json!(3)));
    }
}
