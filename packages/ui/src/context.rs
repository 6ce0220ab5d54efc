//! One place that wires configuration, session and HTTP client together and
//! hands out controllers sharing them.

use std::sync::Arc;

use api::{ApiError, Auth, Comments, HttpClient, Posts, SessionStore, Users};
use store::{ClientConfig, KeyValueStore};

use crate::auth::AuthController;
use crate::comments::CommentsController;
use crate::feed::FeedController;

#[derive(Clone)]
pub struct AppContext {
    config: ClientConfig,
    client: Arc<HttpClient>,
}

impl AppContext {
    /// Restore the session from `backend` and build the HTTP client from
    /// `config.api`.
    pub fn new(config: ClientConfig, backend: impl KeyValueStore + 'static) -> Result<Self, ApiError> {
        let session = SessionStore::open(backend);
        let client = HttpClient::from_config(&config.api, session)?;
        tracing::debug!("Client for {} ready", client.base_url());
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn client(&self) -> Arc<HttpClient> {
        self.client.clone()
    }

    pub fn auth(&self) -> AuthController {
        AuthController::new(
            Auth::new(self.client()),
            Users::new(self.client()),
            self.session().clone(),
        )
    }

    pub fn feed(&self) -> FeedController {
        FeedController::new(
            Posts::new(self.client()),
            self.session().clone(),
            self.config.feed.page_size,
        )
    }

    pub fn comments(&self, post_id: &str) -> CommentsController {
        CommentsController::new(
            Comments::new(self.client()),
            post_id,
            self.config.feed.comments_page_size,
        )
    }
}
