//! Sign-in state for views: who is signed in, whether an auth call is running,
//! and the last error message.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::{Auth, SessionStore, User, Users};

use crate::forms::{LoginForm, ProfileForm, SignUpForm};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Clone)]
pub struct AuthController {
    auth: Auth,
    users: Users,
    session: SessionStore,
    state: Arc<Mutex<AuthState>>,
}

impl AuthController {
    pub fn new(auth: Auth, users: Users, session: SessionStore) -> Self {
        let user = session.user();
        Self {
            auth,
            users,
            session,
            state: Arc::new(Mutex::new(AuthState {
                user,
                ..AuthState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AuthState {
        self.lock().clone()
    }

    /// Re-read the persisted session, e.g. at startup.
    pub fn restore(&self) -> Option<User> {
        let user = self.session.reload().map(|s| s.user);
        match &user {
            Some(user) => tracing::info!("Restored session for {}", user.user_name),
            None => tracing::debug!("No stored session"),
        }
        self.lock().user = user.clone();
        user
    }

    fn start(&self) {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
    }

    fn fail(&self, message: impl Display) {
        let message = message.to_string();
        tracing::error!("Auth: {}", message);
        let mut state = self.lock();
        state.loading = false;
        state.error = Some(message);
    }

    fn signed_in(&self, user: User) -> User {
        tracing::info!("Signed in as {}", user.user_name);
        let mut state = self.lock();
        state.loading = false;
        state.error = None;
        state.user = Some(user.clone());
        user
    }

    fn finish(&self, result: Result<User, api::ApiError>) -> Option<User> {
        match result {
            Ok(user) => Some(self.signed_in(user)),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Option<User> {
        let (email, password) = match form.validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                self.fail(errors);
                return None;
            }
        };
        self.start();
        let result = self.auth.login(&email, &password).await;
        self.finish(result)
    }

    pub async fn register(&self, form: &SignUpForm) -> Option<User> {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.fail(errors);
                return None;
            }
        };
        self.start();
        let result = self.auth.register(&request).await;
        self.finish(result)
    }

    /// Exchange an identity-provider credential for a session.
    pub async fn google_sign_in(&self, credential: &str) -> Option<User> {
        if credential.trim().is_empty() {
            self.fail("Missing sign-in credential");
            return None;
        }
        self.start();
        let result = self.auth.google_sign_in(credential).await;
        self.finish(result)
    }

    pub fn logout(&self) -> bool {
        let result = self.auth.logout();
        let mut state = self.lock();
        // A failed clear leaves the session active.
        state.user = self.session.user();
        state.loading = false;
        match result {
            Ok(()) => {
                tracing::info!("Signed out");
                state.error = None;
                true
            }
            Err(e) => {
                tracing::error!("Auth: {}", e);
                state.error = Some(e.to_string());
                false
            }
        }
    }

    /// Fetch the signed-in user's profile and persist it.
    pub async fn refresh_profile(&self) -> Option<User> {
        let Some(id) = self.session.user_id() else {
            self.fail("Not signed in");
            return None;
        };
        self.start();
        let result = self.users.get(&id).await;
        self.store_profile(result)
    }

    /// Change full name and username. A taken username surfaces as
    /// [`api::USERNAME_TAKEN`].
    pub async fn update_profile(&self, form: &ProfileForm) -> Option<User> {
        let Some(current) = self.session.user() else {
            self.fail("Not signed in");
            return None;
        };
        let update = match form.validate(&current) {
            Ok(update) => update,
            Err(errors) => {
                self.fail(errors);
                return None;
            }
        };
        self.start();
        let result = self.users.update(&current.id, &update).await;
        self.store_profile(result)
    }

    fn store_profile(&self, result: Result<User, api::ApiError>) -> Option<User> {
        let user = match result.and_then(|user| {
            self.session.update_user(user.clone())?;
            Ok(user)
        }) {
            Ok(user) => user,
            Err(e) => {
                self.fail(e);
                return None;
            }
        };
        let mut state = self.lock();
        state.loading = false;
        state.error = None;
        state.user = Some(user.clone());
        Some(user)
    }
}
