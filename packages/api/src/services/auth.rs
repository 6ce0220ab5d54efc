//! Sign-in endpoints. Every successful call establishes the session in the
//! [`SessionStore`](crate::SessionStore) shared with the HTTP client.

use std::sync::Arc;

use crate::client::{decode, HttpClient, Method, RequestBody};
use crate::error::ApiError;
use crate::models::{AuthResponse, RegisterRequest, User};
use crate::session::Session;

#[derive(Clone)]
pub struct Auth {
    client: Arc<HttpClient>,
}

impl Auth {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// `POST /auth/login {emailOrUserName, password}`.
    pub async fn login(&self, email_or_user_name: &str, password: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({
            "emailOrUserName": email_or_user_name,
            "password": password,
        });
        self.sign_in("/auth/login", RequestBody::Json(body)).await
    }

    /// `POST /auth/register {email, fullName, userName, password}`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.sign_in("/auth/register", RequestBody::json(request)?).await
    }

    /// `POST /auth/googleSignin {credential}`. The credential is the opaque
    /// token handed over by the identity provider's own client library.
    pub async fn google_sign_in(&self, credential: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({ "credential": credential });
        self.sign_in("/auth/googleSignin", RequestBody::Json(body)).await
    }

    /// Forget the session locally.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session().clear()
    }

    async fn sign_in(&self, path: &str, body: RequestBody) -> Result<User, ApiError> {
        let response = self.client.request_anonymous(Method::POST, path, body).await?;
        let auth: AuthResponse = decode(response).await?;
        let user = auth.user.clone();
        self.client.session().establish(Session {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            user: auth.user,
        })?;
        Ok(user)
    }
}
