//! # HTTP client wrapper: bearer auth and transparent token refresh
//!
//! [`HttpClient`] is the single configured client every service goes through.
//!
//! ## Per request
//!
//! 1. Read the current access token from the [`SessionStore`] (at call time,
//!    never cached) and send it as `Authorization: JWT <token>`.
//! 2. On `401 Unauthorized`, refresh the token once via `POST /refresh
//!    {token}` and replay the request exactly once with the new token.
//! 3. Map any remaining non-success status to an [`ApiError`]. A second `401`
//!    is surfaced as [`ApiError::Unauthorized`]; there is no further retry.
//!
//! ## Single-flight refresh
//!
//! Concurrent requests that fail with the same stale token must not each
//! mint a new one. Refreshes are serialised behind an async mutex, and a caller
//! that acquires it after another caller already replaced the stale token
//! reuses the new token instead of calling `/refresh` again.
//!
//! ## Replayable bodies
//!
//! A `reqwest` multipart form is consumed when sent, so requests are described
//! by a [`RequestBody`] and rebuilt for the replay.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

pub use reqwest::Method;

use crate::error::ApiError;
use crate::models::{RefreshResponse, Schema};
use crate::session::SessionStore;

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/refresh";

/// One field of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// A request body that can be rebuilt for a replay.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Serialise any value into a JSON body.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Validation(format!("unserialisable body: {e}")))
    }
}

/// Authenticated REST client.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    refresh_gate: Mutex<()>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Build a client from `[api]` settings. A zero timeout disables it.
    pub fn from_config(config: &store::config::ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        Ok(Self::with_client(builder.build()?, config.base_url.clone(), session))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send an authenticated request, refreshing and replaying once on `401`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: &[(&str, String)],
    ) -> Result<Response, ApiError> {
        let sent_token = self.session.access_token();
        let response = self
            .send_once(&method, path, &body, query, sent_token.as_deref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::ensure_success(response, path).await;
        }

        tracing::warn!("{} {} returned 401, refreshing access token", method, path);
        let fresh_token = self.refresh_access_token(sent_token.as_deref()).await?;
        let replayed = self
            .send_once(&method, path, &body, query, Some(&fresh_token))
            .await?;
        Self::ensure_success(replayed, path).await
    }

    /// Send a request without credentials and without the refresh-and-retry.
    /// Used by the sign-in endpoints, where a `401` means bad credentials.
    pub async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Response, ApiError> {
        let response = self.send_once(&method, path, &body, &[], None).await?;
        Self::ensure_success(response, path).await
    }

    /// GET `path` and decode the checked JSON body.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Schema,
    {
        let response = self
            .request(Method::GET, path, RequestBody::Empty, query)
            .await?;
        decode(response).await
    }

    /// Send `body` and decode the checked JSON response.
    pub async fn send_json<T>(&self, method: Method, path: &str, body: RequestBody) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Schema,
    {
        let response = self.request(method, path, body, &[]).await?;
        decode(response).await
    }

    /// Send a request whose response body is ignored (e.g. `DELETE` → 204).
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.request(method, path, RequestBody::Empty, &[]).await?;
        Ok(())
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("JWT {token}"));
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Multipart(parts) => request.multipart(build_form(parts)?),
        };

        tracing::debug!("{} {}", method, path);
        Ok(request.send().await?)
    }

    /// Mint a new access token, or reuse one another caller already minted
    /// since `stale` was read.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token() {
            if stale != Some(current.as_str()) {
                tracing::debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| ApiError::Unauthorized("not signed in".to_string()))?;

        let body = RequestBody::Json(serde_json::json!({ "token": refresh_token }));
        let response = self
            .send_once(&Method::POST, REFRESH_PATH, &body, &[], None)
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Token refresh rejected with {}", status);
            return Err(ApiError::Unauthorized("session expired".to_string()));
        }

        let refreshed: RefreshResponse = decode(response).await?;
        self.session
            .update_tokens(&refreshed.access_token, refreshed.refresh_token.as_deref())?;
        tracing::info!("Access token refreshed");
        Ok(refreshed.access_token)
    }

    async fn ensure_success(response: Response, path: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, path, &body))
    }
}

/// Decode a JSON body into `T` and run its schema check.
pub async fn decode<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned + Schema,
{
    let bytes = response.bytes().await?;
    let value: T = serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
    value.check().map_err(ApiError::Decode)
}

fn build_form(parts: &[FormPart]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}
