use std::sync::Arc;

use crate::client::{HttpClient, Method, RequestBody};
use crate::error::ApiError;
use crate::models::{Comment, Page};

use super::page_query;

/// `/comments` endpoints.
#[derive(Clone)]
pub struct Comments {
    client: Arc<HttpClient>,
}

impl Comments {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// `GET /comments/post/:postId?skip=&limit=`.
    pub async fn list(&self, post_id: &str, skip: u32, limit: u32) -> Result<Page<Comment>, ApiError> {
        let query = page_query(skip, limit)?;
        self.client
            .get_json(&format!("/comments/post/{post_id}"), &query)
            .await
    }

    pub async fn add(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let body = serde_json::json!({ "postId": post_id, "content": content });
        self.client
            .send_json(Method::POST, "/comments", RequestBody::Json(body))
            .await
    }

    pub async fn update(&self, id: &str, content: &str) -> Result<Comment, ApiError> {
        let body = serde_json::json!({ "content": content });
        self.client
            .send_json(Method::PUT, &format!("/comments/{id}"), RequestBody::Json(body))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &format!("/comments/{id}"))
            .await
    }
}
