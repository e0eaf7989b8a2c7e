//! Typed access to the auth entries in durable storage. This is the only code
//! that reads or writes `user_token`, `username`, and `userInfo`.

use crate::{
    app_lib::{
        AppError,
        storage::{ClientStorage, USER_INFO_KEY, USER_TOKEN_KEY, USERNAME_KEY},
    },
    features::auth::types::UserInfo,
};
use std::rc::Rc;
use tracing::warn;

#[derive(Clone)]
pub struct AuthStore {
    storage: Rc<dyn ClientStorage>,
}

impl AuthStore {
    pub fn new(storage: Rc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub fn auth_token(&self) -> Option<String> {
        self.storage
            .get(USER_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn username(&self) -> Option<String> {
        self.storage.get(USERNAME_KEY)
    }

    /// Reads the cached user record; missing or malformed JSON reads as a non-admin user.
    pub fn user_info(&self) -> UserInfo {
        self.storage
            .get(USER_INFO_KEY)
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .inspect_err(|err| warn!("ignoring malformed cached user info: {err}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some()
    }

    pub fn save_token(&self, token: &str) -> Result<(), AppError> {
        self.storage.set(USER_TOKEN_KEY, token)
    }

    pub fn save_profile(&self, info: &UserInfo) -> Result<(), AppError> {
        let encoded = serde_json::to_string(info)
            .map_err(|err| AppError::Serialization(format!("Failed to encode user info: {err}")))?;
        self.storage.set(USERNAME_KEY, &info.username)?;
        self.storage.set(USER_INFO_KEY, &encoded)
    }

    pub fn save_login(&self, token: &str, info: &UserInfo) -> Result<(), AppError> {
        self.save_token(token)?;
        self.save_profile(info)
    }

    /// Removes the auth token and cached user record. The session token is untouched.
    pub fn clear(&self) {
        self.storage.remove(USER_TOKEN_KEY);
        self.storage.remove(USERNAME_KEY);
        self.storage.remove(USER_INFO_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::AuthStore;
    use crate::app_lib::storage::{
        ClientStorage, MemoryStorage, SESSION_TOKEN_KEY, USER_INFO_KEY, USER_TOKEN_KEY,
    };
    use crate::features::auth::types::UserInfo;
    use std::rc::Rc;

    fn store() -> (Rc<MemoryStorage>, AuthStore) {
        let storage = Rc::new(MemoryStorage::new());
        (storage.clone(), AuthStore::new(storage))
    }

    #[test]
    fn save_login_round_trips_user_info() {
        let (_, store) = store();
        let info = UserInfo {
            username: "ada".to_string(),
            is_admin: true,
            ..UserInfo::default()
        };

        store.save_login("jwt", &info).unwrap();

        assert_eq!(store.auth_token().as_deref(), Some("jwt"));
        assert_eq!(store.username().as_deref(), Some("ada"));
        assert_eq!(store.user_info(), info);
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let (storage, store) = store();
        storage.set(USER_TOKEN_KEY, "").unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn malformed_user_info_reads_as_non_admin() {
        let (storage, store) = store();
        storage.set(USER_INFO_KEY, "{not json").unwrap();
        assert!(!store.user_info().is_admin);
    }

    #[test]
    fn clear_leaves_session_token() {
        let (storage, store) = store();
        storage.set(SESSION_TOKEN_KEY, "sess").unwrap();
        store.save_login("jwt", &UserInfo::default()).unwrap();

        store.clear();

        assert!(!store.is_authenticated());
        assert!(storage.get(USER_INFO_KEY).is_none());
        assert_eq!(storage.get(SESSION_TOKEN_KEY).as_deref(), Some("sess"));
    }
}
