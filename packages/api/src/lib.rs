//! # API crate: typed REST access for the Postwall client
//!
//! This crate is the network half of the client. It owns the domain models, the
//! persisted session, the authenticated HTTP client, and one service per REST
//! resource. Controllers in the `ui` crate talk to the backend exclusively
//! through the services defined here.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`HttpClient`]: base URL, `Authorization: JWT <token>` on every request, single-flight token refresh and one replay on `401` |
//! | [`error`] | [`ApiError`], the error taxonomy shared by every service call |
//! | [`models`] | `Post`, `Comment`, `User`, `Page<T>`, request payloads, and the [`Schema`] boundary check |
//! | [`services`] | `Auth`, `Posts`, `Comments`, `Users` request builders |
//! | [`session`] | [`SessionStore`]: the single owner of `accessToken` / `refreshToken` / `user` persistence |
//!
//! ## Request flow
//!
//! A service builds a path, query and [`RequestBody`], hands them to
//! [`HttpClient::request`], and decodes the JSON response into a model. Every
//! decoded value passes [`Schema::check`] before it is returned, so malformed
//! server payloads surface as [`ApiError::Decode`] instead of half-filled
//! entities.

pub mod client;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use client::{FormPart, HttpClient, Method, RequestBody};
pub use error::ApiError;
pub use models::{
    toggle_like, Comment, Identified, ImageUpload, NewPost, Page, Post, PostUpdate,
    RegisterRequest, Schema, User, UserUpdate,
};
pub use services::{Auth, Comments, Posts, Users, USERNAME_TAKEN};
pub use session::{Session, SessionStore};
