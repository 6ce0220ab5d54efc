//! Platform session storage.
//!
//! Returns a [`store::KeyValueStore`] for the session keys:
//! - **Web** (WASM + `web` feature): browser `localStorage` via [`store::LocalStorage`]
//! - **Desktop / CLI** (native): one file per key via [`store::FileStore`]

use store::KeyValueStore;

/// Directory name under the platform data directory.
pub const APP_DIR: &str = "postwall";

/// Create the platform-appropriate session backend, optionally namespaced so
/// several profiles can stay signed in side by side.
///
/// When `profile` is `Some("work")`:
/// - **Web**: keys are stored as `work:accessToken`, ...
/// - **Native**: files live under `<data_dir>/postwall/work/session/`
pub fn session_backend(profile: Option<&str>) -> impl KeyValueStore + 'static {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorage::with_namespace(profile)
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::FileStore::new(session_dir(profile))
    }
}

/// `<data_dir>/postwall[/<profile>]/session`, falling back to the working
/// directory when the platform has no data directory.
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub fn session_dir(profile: Option<&str>) -> std::path::PathBuf {
    let base = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(APP_DIR);
    match profile {
        Some(name) => base.join(name).join("session"),
        None => base.join("session"),
    }
}
