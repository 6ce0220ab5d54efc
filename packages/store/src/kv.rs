//! # Key-value storage: the persistence seam of the client
//!
//! Everything the client keeps between runs (bearer tokens and the signed-in
//! user) is a small string value under a well-known key. [`KeyValueStore`] is the
//! interface the session layer writes through, so the same session logic works
//! against an in-memory map (tests), one-file-per-key on disk (desktop, CLI), or
//! the browser's `localStorage` (web).
//!
//! ## Contract
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | [`get`](KeyValueStore::get) | Returns the stored value, or `None` when the key is absent or unreadable. |
//! | [`set`](KeyValueStore::set) | Stores the value, replacing any previous one. Fails only when the backend cannot write. |
//! | [`remove`](KeyValueStore::remove) | Deletes the key. Removing an absent key is not an error. |
//!
//! Reads degrade to "not stored" rather than failing: a corrupted backend looks
//! like a signed-out client. Writes report failures so callers can keep their
//! in-memory state consistent with what actually reached storage.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`] backend on write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage shared by the session layer.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
