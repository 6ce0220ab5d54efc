use std::sync::Arc;

use crate::client::{HttpClient, Method, RequestBody};
use crate::error::ApiError;
use crate::models::{ImageUpload, NewPost, Page, Post, PostUpdate};

use super::page_query;

/// `/posts` endpoints.
#[derive(Clone)]
pub struct Posts {
    client: Arc<HttpClient>,
}

impl Posts {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// `GET /posts?sender=&skip=&limit=`. `author` scopes the list server-side.
    pub async fn list(&self, skip: u32, limit: u32, author: Option<&str>) -> Result<Page<Post>, ApiError> {
        let mut query = page_query(skip, limit)?;
        if let Some(author) = author {
            query.insert(0, ("sender", author.to_string()));
        }
        self.client.get_json("/posts", &query).await
    }

    pub async fn get(&self, id: &str) -> Result<Post, ApiError> {
        self.client.get_json(&format!("/posts/{id}"), &[]).await
    }

    /// `POST /posts` as multipart (`title`, `content`, optional `image`).
    pub async fn create(&self, post: NewPost) -> Result<Post, ApiError> {
        self.client
            .send_json(Method::POST, "/posts", RequestBody::Multipart(post.into_parts()))
            .await
    }

    /// `PUT /posts/:id` with a JSON partial.
    pub async fn update(&self, id: &str, update: &PostUpdate) -> Result<Post, ApiError> {
        if update.is_empty() {
            return Err(ApiError::Validation("nothing to update".to_string()));
        }
        self.client
            .send_json(Method::PUT, &format!("/posts/{id}"), RequestBody::json(update)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.send_empty(Method::DELETE, &format!("/posts/{id}")).await
    }

    /// Replace the post image (multipart `PUT /posts/:id`).
    pub async fn set_image(&self, id: &str, image: ImageUpload) -> Result<Post, ApiError> {
        self.client
            .send_json(
                Method::PUT,
                &format!("/posts/{id}"),
                RequestBody::Multipart(vec![image.into_part("image")]),
            )
            .await
    }

    /// `PUT /posts/removeImage/:id`.
    pub async fn clear_image(&self, id: &str) -> Result<Post, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("/posts/removeImage/{id}"), RequestBody::Empty)
            .await
    }
}
