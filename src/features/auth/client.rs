//! Client wrappers for the user and admin API endpoints. Passwords and tokens
//! pass through here and must never be logged.

use crate::{
    app_lib::{AppError, Gateway, transport::Transport},
    features::auth::{
        store::AuthStore,
        types::{DataResponse, ListResponse, LoginData, SignupRequest, UserInfo},
    },
};
use tracing::{info, warn};

const LOGIN_PATH: &str = "/api/v1/user/login";
const PROFILE_PATH: &str = "/api/v1/user/me";
const SIGNUP_PATH: &str = "/api/v1/user/signup";
const ADMIN_USERS_PATH: &str = "/api/v1/admin/users";

/// Exchanges a username and password for a bearer token, then caches the
/// user's profile so the route guard can read the admin flag.
pub async fn login<T: Transport>(
    gateway: &Gateway<T>,
    store: &AuthStore,
    username: &str,
    password: &str,
) -> Result<UserInfo, AppError> {
    let response: DataResponse<LoginData> = gateway
        .post_form(LOGIN_PATH, &[("username", username), ("password", password)])
        .await?;

    let token = response
        .data
        .and_then(|data| data.token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Server {
            code: response.code,
            message: fallback_message(&response.message, "Login failed."),
        })?;

    store.save_token(&token)?;
    match fetch_profile(gateway).await {
        Ok(mut profile) => {
            if profile.username.is_empty() {
                profile.username = username.to_string();
            }
            store.save_profile(&profile)?;
            info!(is_admin = profile.is_admin, "signed in");
            Ok(profile)
        }
        Err(err) => {
            warn!("profile fetch after login failed: {err}");
            store.clear();
            Err(err)
        }
    }
}

/// Stores a bearer token issued by face verification and caches the profile.
pub async fn adopt_token<T: Transport>(
    gateway: &Gateway<T>,
    store: &AuthStore,
    token: &str,
) -> Result<UserInfo, AppError> {
    store.save_token(token)?;
    let profile = fetch_profile(gateway).await.inspect_err(|_| store.clear())?;
    store.save_profile(&profile)?;
    info!(is_admin = profile.is_admin, "signed in with face verification");
    Ok(profile)
}

pub async fn fetch_profile<T: Transport>(gateway: &Gateway<T>) -> Result<UserInfo, AppError> {
    let response: DataResponse<UserInfo> = gateway.get_json(PROFILE_PATH).await?;
    response.data.ok_or_else(|| AppError::Server {
        code: response.code,
        message: fallback_message(&response.message, "Profile unavailable."),
    })
}

pub async fn signup<T: Transport>(
    gateway: &Gateway<T>,
    request: &SignupRequest,
) -> Result<UserInfo, AppError> {
    let response: DataResponse<UserInfo> = gateway.post_json(SIGNUP_PATH, request).await?;
    if !response.success {
        return Err(AppError::Server {
            code: response.code,
            message: fallback_message(&response.message, "Signup failed."),
        });
    }
    response.data.ok_or_else(|| AppError::Parse("Signup response had no user.".to_string()))
}

pub async fn list_users<T: Transport>(gateway: &Gateway<T>) -> Result<Vec<UserInfo>, AppError> {
    let response: ListResponse<UserInfo> = gateway.get_json(ADMIN_USERS_PATH).await?;
    Ok(response.data)
}

fn fallback_message(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::{
        api::signal_channel,
        storage::{ClientStorage, MemoryStorage, USER_INFO_KEY, USER_TOKEN_KEY, USERNAME_KEY},
        transport::{Method, RequestBody},
    };
    use crate::test_support::{FakeTransport, StorageCredentials};
    use std::rc::Rc;

    fn setup() -> (FakeTransport, Rc<MemoryStorage>, AuthStore, Gateway<FakeTransport>) {
        let transport = FakeTransport::new();
        let storage = Rc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone());
        let (signals, _receiver) = signal_channel();
        let gateway = Gateway::new(
            transport.clone(),
            "",
            Rc::new(StorageCredentials::new(storage.clone())),
            signals,
        );
        (transport, storage, store, gateway)
    }

    #[tokio::test]
    async fn login_saves_token_and_profile() {
        let (transport, _storage, store, gateway) = setup();
        transport.respond(
            Method::Post,
            LOGIN_PATH,
            200,
            r#"{"success":true,"message":"ok","code":200,"data":{"token":"jwt-1","token_type":"Bearer"}}"#,
        );
        transport.respond(
            Method::Get,
            PROFILE_PATH,
            200,
            r#"{"success":true,"message":"ok","code":200,"data":{"username":"ada","is_admin":true}}"#,
        );

        let profile = login(&gateway, &store, "ada", "secret").await.unwrap();

        assert!(profile.is_admin);
        assert_eq!(store.auth_token().as_deref(), Some("jwt-1"));
        assert!(store.user_info().is_admin);
        let profile_request = transport.last_request().unwrap();
        assert_eq!(profile_request.header("Authorization"), Some("Bearer jwt-1"));
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Form("username=ada&password=secret".to_string())
        );
    }

    #[tokio::test]
    async fn adopted_face_token_is_saved_with_profile() {
        let (transport, storage, store, gateway) = setup();
        transport.respond(
            Method::Get,
            PROFILE_PATH,
            200,
            r#"{"success":true,"message":"ok","code":200,"data":{"username":"grace","is_admin":false}}"#,
        );

        let profile = adopt_token(&gateway, &store, "face-jwt").await.unwrap();

        assert_eq!(profile.username, "grace");
        assert_eq!(storage.get(USER_TOKEN_KEY).as_deref(), Some("face-jwt"));
        assert_eq!(storage.get(USERNAME_KEY).as_deref(), Some("grace"));
        let cached: UserInfo =
            serde_json::from_str(&storage.get(USER_INFO_KEY).unwrap()).unwrap();
        assert_eq!(cached.username, "grace");
        assert!(!cached.is_admin);
        assert_eq!(
            transport.last_request().unwrap().header("Authorization"),
            Some("Bearer face-jwt")
        );
    }

    #[tokio::test]
    async fn adopted_face_token_is_dropped_when_profile_fails() {
        let (transport, storage, store, gateway) = setup();
        transport.respond(Method::Get, PROFILE_PATH, 500, "down");

        assert!(adopt_token(&gateway, &store, "face-jwt").await.is_err());
        assert!(!store.is_authenticated());
        assert!(!storage.contains(USER_TOKEN_KEY));
        assert!(!storage.contains(USER_INFO_KEY));
    }

    #[tokio::test]
    async fn login_without_token_is_a_server_error() {
        let (transport, storage, store, gateway) = setup();
        transport.respond(
            Method::Post,
            LOGIN_PATH,
            200,
            r#"{"success":false,"message":"","code":400,"data":null}"#,
        );

        let err = login(&gateway, &store, "ada", "secret").await.unwrap_err();

        assert_eq!(
            err,
            AppError::Server {
                code: 400,
                message: "Login failed.".to_string()
            }
        );
        assert!(storage.get(USER_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn failed_profile_fetch_discards_token() {
        let (transport, _storage, store, gateway) = setup();
        transport.respond(
            Method::Post,
            LOGIN_PATH,
            200,
            r#"{"success":true,"message":"ok","code":200,"data":{"token":"jwt-1"}}"#,
        );
        transport.respond(Method::Get, PROFILE_PATH, 500, "down");

        assert!(login(&gateway, &store, "ada", "secret").await.is_err());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn signup_reports_server_message() {
        let (transport, _storage, _store, gateway) = setup();
        transport.respond(
            Method::Post,
            SIGNUP_PATH,
            200,
            r#"{"success":false,"message":"username already taken","code":400,"data":null}"#,
        );
        let request = SignupRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            full_name: None,
        };

        let err = signup(&gateway, &request).await.unwrap_err();

        assert_eq!(err.detail(), "username already taken");
        match &transport.last_request().unwrap().body {
            RequestBody::Json(body) => assert!(!body.contains("full_name")),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_users_returns_rows() {
        let (transport, _storage, _store, gateway) = setup();
        transport.respond(
            Method::Get,
            ADMIN_USERS_PATH,
            200,
            r#"{"success":true,"message":"ok","data":[{"username":"ada","is_admin":true},{"username":"bob"}],"total":2}"#,
        );

        let users = list_users(&gateway).await.unwrap();

        assert_eq!(users.len(), 2);
        assert!(!users[1].is_admin);
    }
}
