//! Fixtures shared by the controller tests.

use std::sync::Arc;

use api::{HttpClient, Session, SessionStore, User};
use store::MemoryStore;
use wiremock::MockServer;

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        user_name: id.to_string(),
        full_name: format!("User {id}"),
        avatar_url: None,
        refresh_tokens: Vec::new(),
    }
}

/// A client for `server` whose session is signed in as `user_id`.
pub fn signed_in(server: &MockServer, user_id: &str) -> Arc<HttpClient> {
    let session = SessionStore::open(MemoryStore::new());
    session
        .establish(Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            user: user(user_id),
        })
        .unwrap();
    Arc::new(HttpClient::new(server.uri(), session))
}

pub fn signed_out(server: &MockServer) -> Arc<HttpClient> {
    Arc::new(HttpClient::new(
        server.uri(),
        SessionStore::open(MemoryStore::new()),
    ))
}

pub fn post_json(id: &str, author: &str, likes: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "title": format!("title {id}"),
        "content": format!("content {id}"),
        "senderId": author,
        "usersIdLikes": likes,
    })
}

pub fn comment_json(id: &str, post_id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "postId": post_id,
        "senderId": "u1",
        "content": content,
    })
}

pub fn page_json(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    serde_json::json!({ "items": items, "totalItems": total })
}
