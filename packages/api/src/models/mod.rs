//! Data models for the application.

mod comment;
mod page;
mod post;
mod user;

pub use comment::Comment;
pub use page::Page;
pub use post::{toggle_like, ImageUpload, NewPost, Post, PostUpdate, ALLOWED_IMAGE_TYPES};
pub use user::{AuthResponse, RefreshResponse, RegisterRequest, User, UserUpdate};

/// Entities with a stable server-assigned identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Boundary check run on every decoded response before it becomes a domain
/// value. Returns a description of the first violated rule.
pub trait Schema: Sized {
    fn check(self) -> Result<Self, String>;
}

pub(crate) fn require_non_empty(entity: &str, field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{entity} is missing `{field}`"))
    } else {
        Ok(())
    }
}
