use std::sync::Arc;

use crate::client::{HttpClient, Method, RequestBody};
use crate::error::ApiError;
use crate::models::{User, UserUpdate};

/// Message shown when a profile update collides with an existing username.
pub const USERNAME_TAKEN: &str = "Username is already taken";

/// `/users` endpoints.
#[derive(Clone)]
pub struct Users {
    client: Arc<HttpClient>,
}

impl Users {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        self.client.get_json(&format!("/users/{id}"), &[]).await
    }

    /// `PUT /users/:id`. A duplicate username maps to [`USERNAME_TAKEN`].
    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("/users/{id}"), RequestBody::json(update)?)
            .await
            .map_err(|e| match e {
                ApiError::Conflict(_) => ApiError::Conflict(USERNAME_TAKEN.to_string()),
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use store::MemoryStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_duplicate_username_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/u1"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "code": 11000, "keyValue": { "userName": "ann" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let users = Users::new(Arc::new(HttpClient::new(
            server.uri(),
            SessionStore::open(MemoryStore::new()),
        )));
        let update = UserUpdate {
            email: "a@b.co".into(),
            user_name: "ann".into(),
            full_name: "Ann".into(),
            avatar_url: None,
        };
        let err = users.update("u1", &update).await.unwrap_err();
        assert_eq!(err.to_string(), USERNAME_TAKEN);
    }
}
