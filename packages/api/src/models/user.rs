//! # User model and authentication payloads
//!
//! ## [`User`]
//!
//! The profile returned by `/auth/login`, `/auth/register` and `/users/:id`,
//! and the value persisted under the `user` key of the session store. Field
//! names follow the backend's JSON (`_id`, `userName`, `fullName`, `imgUrl`,
//! `refreshToken`). The password is never part of the client model.
//!
//! ## Auth payloads
//!
//! - [`RegisterRequest`]: sign-up form body.
//! - [`AuthResponse`]: `{accessToken, refreshToken, user}` returned by every
//!   sign-in endpoint.
//! - [`RefreshResponse`]: `{accessToken}` from `/refresh`, optionally with a
//!   rotated `refreshToken`.
//! - [`UserUpdate`]: editable profile fields sent to `PUT /users/:id`.

use serde::{Deserialize, Serialize};

use super::{require_non_empty, Identified, Schema};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(rename = "imgUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Vec::is_empty")]
    pub refresh_tokens: Vec<String>,
}

impl User {
    /// Full name, then username, then email.
    pub fn display_name(&self) -> &str {
        [&self.full_name, &self.user_name]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map(String::as_str)
            .unwrap_or(&self.email)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for User {
    fn check(self) -> Result<Self, String> {
        require_non_empty("user", "_id", &self.id)?;
        Ok(self)
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub user_name: String,
    pub password: String,
}

/// Response of the sign-in endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl Schema for AuthResponse {
    fn check(self) -> Result<Self, String> {
        require_non_empty("auth response", "accessToken", &self.access_token)?;
        require_non_empty("auth response", "refreshToken", &self.refresh_token)?;
        let user = self.user.check()?;
        Ok(Self { user, ..self })
    }
}

/// Response of `POST /refresh`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Schema for RefreshResponse {
    fn check(self) -> Result<Self, String> {
        require_non_empty("refresh response", "accessToken", &self.access_token)?;
        Ok(self)
    }
}

/// Editable profile fields for `PUT /users/:id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: String,
    pub user_name: String,
    pub full_name: String,
    #[serde(rename = "imgUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}
