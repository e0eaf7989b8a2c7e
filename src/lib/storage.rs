//! Durable client storage behind a small trait so the session and auth state
//! machines can run against `localStorage` in the browser and an in-memory map
//! in tests. Values stored here are readable by any script on the origin, so
//! callers must not log them.

use super::errors::AppError;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub const SESSION_TOKEN_KEY: &str = "session_token";
pub const USER_TOKEN_KEY: &str = "user_token";
pub const USERNAME_KEY: &str = "username";
pub const USER_INFO_KEY: &str = "userInfo";

/// Key/value storage that survives page reloads.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str);
}

/// Process-local storage, used by tests and when `localStorage` is unavailable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    /// Opens `window.localStorage`, returning `None` when it is blocked or absent.
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl ClientStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| AppError::Storage(format!("Failed to persist {key}.")))
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// Returns the best durable storage available on this platform.
pub fn default_storage() -> Rc<dyn ClientStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = BrowserStorage::local() {
            return Rc::new(storage);
        }
        tracing::warn!("localStorage unavailable, falling back to memory storage");
    }

    Rc::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::{ClientStorage, MemoryStorage, SESSION_TOKEN_KEY};

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(SESSION_TOKEN_KEY), None);

        storage.set(SESSION_TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(SESSION_TOKEN_KEY), Some("abc".to_string()));

        storage.remove(SESSION_TOKEN_KEY);
        assert!(!storage.contains(SESSION_TOKEN_KEY));
    }

    #[test]
    fn memory_storage_overwrites_existing_value() {
        let storage = MemoryStorage::new();
        storage.set("username", "first").unwrap();
        storage.set("username", "second").unwrap();
        assert_eq!(storage.get("username"), Some("second".to_string()));
    }
}
