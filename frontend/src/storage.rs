//! Browser `localStorage` adapter for the shared TTL cache.

use lms_shared::cache::{Clock, StorageBackend, StorageError};
use wasm_bindgen::{JsCast, JsValue};

/// `window.localStorage`, or nothing when the browser denies access.
///
/// A missing store turns every operation into `StorageError::Unavailable`,
/// which the cache treats as a miss.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage is not available, cached values will not survive reloads");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl StorageBackend for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(error: JsValue) -> StorageError {
    let Some(error) = error.dyn_ref::<js_sys::Error>() else {
        return StorageError::Backend(format!("{error:?}"));
    };
    let name = String::from(error.name());
    let message = String::from(error.message());
    if name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED" {
        StorageError::QuotaExceeded(message)
    } else {
        StorageError::Backend(format!("{name}: {message}"))
    }
}

/// Wall clock from `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
