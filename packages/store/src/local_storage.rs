//! # Browser `localStorage` store: web persistence
//!
//! [`LocalStorage`] is the [`KeyValueStore`] used on the **web platform**. It
//! writes straight through to `window.localStorage`, so the session survives a
//! page reload exactly like any other single-page application state.
//!
//! ## Namespacing
//!
//! Keys are prefixed with `"<namespace>:"` when a namespace is given, which lets
//! several clients share one origin without clobbering each other's tokens.
//! Without a namespace the bare keys (`accessToken`, `refreshToken`, `user`)
//! are used.
//!
//! ## Error handling
//!
//! Reads swallow errors (private browsing modes may deny access) and return
//! `None`. Writes surface [`StoreError::Unavailable`] so the session layer can
//! keep its in-memory copy in step with storage.

use crate::kv::{KeyValueStore, StoreError};

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Debug, Default)]
pub struct LocalStorage {
    prefix: Option<String>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::with_namespace(None)
    }

    pub fn with_namespace(namespace: Option<&str>) -> Self {
        Self {
            prefix: namespace.map(|ns| format!("{ns}:")),
        }
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = Self::storage().ok()?;
        storage.get_item(&self.full_key(key)).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.full_key(key), value)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&self.full_key(key))
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}
