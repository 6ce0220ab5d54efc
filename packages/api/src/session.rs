//! # Session store: the one owner of persisted credentials
//!
//! [`SessionStore`] holds the signed-in user and bearer tokens in memory and
//! mirrors them into a [`KeyValueStore`] under three well-known keys:
//!
//! | Key | Value |
//! |-----|-------|
//! | [`ACCESS_TOKEN_KEY`] (`"accessToken"`) | short-lived bearer token |
//! | [`REFRESH_TOKEN_KEY`] (`"refreshToken"`) | token used to mint a new access token |
//! | [`USER_KEY`] (`"user"`) | JSON-serialised [`User`] |
//!
//! The handle is cheap to clone; every clone sees the same session. The HTTP
//! client reads the access token from it on every request, and only sign-in,
//! token refresh, profile updates and logout write to it.
//!
//! ## Consistency
//!
//! Every mutation writes storage first and updates memory only once all writes
//! succeeded, under the same write lock, so the persisted copy never lags the
//! in-memory one. A mutation touches several keys; when one of its writes
//! fails, the keys already written are put back to their previous values
//! before the error is returned, and memory is left unchanged. If even that
//! restore fails, every session key is removed so the next run starts signed
//! out instead of pairing one user's tokens with another user's profile.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use store::KeyValueStore;

use crate::error::ApiError;
use crate::models::User;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// The active session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Shared handle to the current session and its persisted copy.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// Open a store over `backend` and restore any persisted session.
    pub fn open(backend: impl KeyValueStore + 'static) -> Self {
        let store = Self {
            backend: Arc::new(backend),
            current: Arc::new(RwLock::new(None)),
        };
        store.reload();
        store
    }

    /// Re-read the persisted session, replacing the in-memory copy.
    ///
    /// A session is restored only when all three keys are present and the
    /// user decodes; anything less counts as signed out.
    pub fn reload(&self) -> Option<Session> {
        let restored = self.read_backend();
        *self.write() = restored.clone();
        restored
    }

    fn read_backend(&self) -> Option<Session> {
        let access_token = self.backend.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.backend.get(REFRESH_TOKEN_KEY)?;
        let raw_user = self.backend.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => {
                tracing::debug!("Restored session for user {}", user.id);
                Some(Session {
                    access_token,
                    refresh_token,
                    user,
                })
            }
            Err(e) => {
                tracing::warn!("Ignoring stored user that does not decode: {}", e);
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.refresh_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.user.id.clone())
    }

    /// Replace the session after a successful sign-in.
    pub fn establish(&self, session: Session) -> Result<(), ApiError> {
        let mut current = self.write();
        let raw_user = encode_user(&session.user)?;
        self.write_keys(&[
            (ACCESS_TOKEN_KEY, Some(session.access_token.as_str())),
            (REFRESH_TOKEN_KEY, Some(session.refresh_token.as_str())),
            (USER_KEY, Some(raw_user.as_str())),
        ])?;
        tracing::info!("Signed in as {}", session.user.display_name());
        *current = Some(session);
        Ok(())
    }

    /// Store tokens minted by a refresh. A `None` refresh token keeps the
    /// current one. Without an active session this is a no-op.
    pub fn update_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut current = self.write();
        let Some(session) = current.as_mut() else {
            tracing::warn!("Dropping refreshed token: no active session");
            return Ok(());
        };
        let mut writes = vec![(ACCESS_TOKEN_KEY, Some(access_token))];
        if let Some(refresh_token) = refresh_token {
            writes.push((REFRESH_TOKEN_KEY, Some(refresh_token)));
        }
        self.write_keys(&writes)?;
        session.access_token = access_token.to_string();
        if let Some(refresh_token) = refresh_token {
            session.refresh_token = refresh_token.to_string();
        }
        Ok(())
    }

    /// Replace the stored profile, keeping the tokens.
    pub fn update_user(&self, user: User) -> Result<(), ApiError> {
        let mut current = self.write();
        let Some(session) = current.as_mut() else {
            return Err(ApiError::Unauthorized("no active session".to_string()));
        };
        self.backend.set(USER_KEY, &encode_user(&user)?)?;
        session.user = user;
        Ok(())
    }

    /// Sign out: remove every persisted key and forget the session.
    pub fn clear(&self) -> Result<(), ApiError> {
        let mut current = self.write();
        self.write_keys(&[
            (ACCESS_TOKEN_KEY, None),
            (REFRESH_TOKEN_KEY, None),
            (USER_KEY, None),
        ])?;
        if current.take().is_some() {
            tracing::info!("Signed out");
        }
        Ok(())
    }

    /// Apply `writes` in order (`None` removes the key). On failure the keys
    /// already written get their previous values back.
    fn write_keys(&self, writes: &[(&str, Option<&str>)]) -> Result<(), ApiError> {
        let previous: Vec<(&str, Option<String>)> = writes
            .iter()
            .map(|&(key, _)| (key, self.backend.get(key)))
            .collect();

        for (done, &(key, value)) in writes.iter().enumerate() {
            let result = match value {
                Some(value) => self.backend.set(key, value),
                None => self.backend.remove(key),
            };
            if let Err(e) = result {
                tracing::warn!("Session write to `{}` failed, restoring previous values: {}", key, e);
                self.restore(&previous[..done]);
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn restore(&self, previous: &[(&str, Option<String>)]) {
        for (key, value) in previous {
            let result = match value {
                Some(value) => self.backend.set(key, value),
                None => self.backend.remove(key),
            };
            if let Err(e) = result {
                tracing::error!("Could not restore `{}` ({}), removing the stored session", key, e);
                for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
                    let _ = self.backend.remove(key);
                }
                return;
            }
        }
    }
}

fn encode_user(user: &User) -> Result<String, ApiError> {
    serde_json::to_string(user).map_err(|e| ApiError::Decode(e.to_string()))
}
