//! # Post model and mutation payloads
//!
//! A [`Post`] carries its like set as a `BTreeSet` of user identifiers: the
//! backend sends `usersIdLikes` as an array, and deserialising into a set drops
//! duplicates so the like count is always the number of distinct likers.
//!
//! | Type | Used by |
//! |------|---------|
//! | [`NewPost`] | `POST /posts` (multipart: `title`, `content`, optional `image`) |
//! | [`PostUpdate`] | `PUT /posts/:id` JSON partial (`title`, `content`, `usersIdLikes`) |
//! | [`ImageUpload`] | multipart image part; only JPEG, PNG, GIF and WebP are accepted |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{require_non_empty, Identified, Schema};
use crate::client::FormPart;
use crate::error::ApiError;

/// MIME types accepted for post images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "senderId")]
    pub author_id: String,
    #[serde(rename = "senderName", default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(rename = "senderProfile", default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(rename = "imgUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "usersIdLikes", default)]
    pub likes: BTreeSet<String>,
    #[serde(default)]
    pub comments_count: u64,
}

impl Post {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.contains(user_id)
    }
}

impl Identified for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for Post {
    fn check(self) -> Result<Self, String> {
        require_non_empty("post", "_id", &self.id)?;
        require_non_empty("post", "senderId", &self.author_id)?;
        Ok(self)
    }
}

/// Liker set after toggling `user_id`: added if absent, removed if present.
pub fn toggle_like(likes: &BTreeSet<String>, user_id: &str) -> BTreeSet<String> {
    let mut next = likes.clone();
    if !next.remove(user_id) {
        next.insert(user_id.to_string());
    }
    next
}

/// Partial update for `PUT /posts/:id`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "usersIdLikes", skip_serializing_if = "Option::is_none")]
    pub likes: Option<BTreeSet<String>>,
}

impl PostUpdate {
    /// Update carrying only the liker set.
    pub fn likes(likes: BTreeSet<String>) -> Self {
        Self {
            likes: Some(likes),
            ..Self::default()
        }
    }

    /// Update carrying new text fields.
    pub fn text(title: Option<String>, content: Option<String>) -> Self {
        Self {
            title,
            content,
            likes: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.likes.is_none()
    }
}

/// An image attached to a post.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Rejects anything that is not one of [`ALLOWED_IMAGE_TYPES`].
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ApiError> {
        let content_type = content_type.into();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::Validation(
                "Invalid file type! Please select an image (JPEG, PNG, GIF, WebP).".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(ApiError::Validation("Image file is empty".to_string()));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    pub(crate) fn into_part(self, field: &str) -> FormPart {
        FormPart::File {
            name: field.to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl NewPost {
    pub(crate) fn into_parts(self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("title", self.title),
            FormPart::text("content", self.content),
        ];
        if let Some(image) = self.image {
            parts.push(image.into_part("image"));
        }
        parts
    }
}
