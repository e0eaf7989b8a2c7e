//! Request and response types for user-related API calls. Login payloads carry
//! passwords and bearer tokens, so they must never be logged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard envelope for single-item responses.
#[derive(Clone, Debug, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
    pub data: Option<T>,
}

/// Standard envelope for list responses.
#[derive(Clone, Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginData {
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: String,
}

/// Cached user record; the guard only needs `is_admin`, the rest is kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{DataResponse, LoginData, UserInfo};

    #[test]
    fn user_info_keeps_unknown_fields() {
        let info: UserInfo = serde_json::from_str(
            r#"{"username":"ada","is_admin":true,"email":"ada@example.com","id":7}"#,
        )
        .unwrap();

        assert!(info.is_admin);
        assert_eq!(info.extra.get("id"), Some(&serde_json::json!(7)));

        let encoded = serde_json::to_value(&info).unwrap();
        assert_eq!(encoded["email"], "ada@example.com");
    }

    #[test]
    fn user_info_defaults_to_non_admin() {
        let info: UserInfo = serde_json::from_str("{}").unwrap();
        assert!(!info.is_admin);
        assert!(info.username.is_empty());
    }

    #[test]
    fn login_envelope_decodes_token() {
        let response: DataResponse<LoginData> = serde_json::from_str(
            r#"{"success":true,"message":"ok","code":200,"data":{"token":"jwt","token_type":"Bearer"}}"#,
        )
        .unwrap();
        assert_eq!(response.data.and_then(|data| data.token).as_deref(), Some("jwt"));
    }
}
