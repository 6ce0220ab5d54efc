//! Comment thread of one post: paginated list, add, in-place editing and
//! delete.
//!
//! Editing is split in two. [`begin_edit`](CommentsController::begin_edit) and
//! [`cancel_edit`](CommentsController::cancel_edit) only flip the comment's
//! `editing` flag. [`save_edit`](CommentsController::save_edit) shows the new
//! text at once, sends it, and restores the old text (with the editor reopened)
//! if the server refuses.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::{Comment, Comments};

use crate::forms::validate_comment;
use crate::paging::{LoadOutcome, LoadRequest, LoadState, LoadTicket, PagedList};

#[derive(Debug, Clone, PartialEq)]
pub struct CommentsSnapshot {
    pub post_id: String,
    pub comments: Vec<Comment>,
    pub total: u64,
    pub has_more: bool,
    pub load_state: LoadState,
    pub error: Option<String>,
}

struct CommentsState {
    list: PagedList<Comment>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct CommentsController {
    comments: Comments,
    post_id: Arc<str>,
    state: Arc<Mutex<CommentsState>>,
}

impl CommentsController {
    pub fn new(comments: Comments, post_id: &str, page_size: u32) -> Self {
        Self {
            comments,
            post_id: Arc::from(post_id),
            state: Arc::new(Mutex::new(CommentsState {
                list: PagedList::new(page_size),
                error: None,
            })),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    fn lock(&self) -> MutexGuard<'_, CommentsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, message: impl Display) {
        let message = message.to_string();
        tracing::error!("Comments on {}: {}", self.post_id, message);
        self.lock().error = Some(message);
    }

    pub fn snapshot(&self) -> CommentsSnapshot {
        let state = self.lock();
        CommentsSnapshot {
            post_id: self.post_id.to_string(),
            comments: state.list.items().items().to_vec(),
            total: state.list.items().total(),
            has_more: state.list.items().has_more(),
            load_state: state.list.state().clone(),
            error: state.error.clone(),
        }
    }

    pub async fn load(&self, skip: u32, limit: u32, append: bool) -> bool {
        let ticket = self.lock().list.begin(LoadRequest { skip, limit, append });
        self.run(ticket).await
    }

    pub async fn load_first_page(&self) -> bool {
        let limit = self.lock().list.page_size();
        self.load(0, limit, false).await
    }

    pub async fn load_next_page(&self) -> bool {
        let ticket = self.lock().list.begin_next();
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => false,
        }
    }

    pub async fn retry(&self) -> bool {
        let ticket = self.lock().list.begin_retry();
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => false,
        }
    }

    async fn run(&self, ticket: LoadTicket) -> bool {
        let LoadRequest { skip, limit, .. } = ticket.request;
        let result = self.comments.list(&self.post_id, skip, limit).await;

        let mut state = self.lock();
        match state.list.finish(ticket, result) {
            LoadOutcome::Applied => {
                state.error = None;
                true
            }
            LoadOutcome::Stale => false,
            LoadOutcome::Failed(message) => {
                state.error = Some(message);
                false
            }
        }
    }

    /// Post a comment and append the server copy.
    pub async fn add_comment(&self, content: &str) -> Option<Comment> {
        let content = match validate_comment(content) {
            Ok(content) => content,
            Err(errors) => {
                self.fail(errors);
                return None;
            }
        };

        match self.comments.add(&self.post_id, &content).await {
            Ok(comment) => {
                let mut state = self.lock();
                state.list.items_mut().push(comment.clone());
                state.error = None;
                Some(comment)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Open the editor on `id`. Returns `false` if it is not loaded.
    pub fn begin_edit(&self, id: &str) -> bool {
        self.set_editing(id, true)
    }

    pub fn cancel_edit(&self, id: &str) -> bool {
        self.set_editing(id, false)
    }

    fn set_editing(&self, id: &str, editing: bool) -> bool {
        self.lock()
            .list
            .items_mut()
            .update_item(id, |c| c.editing = editing)
            .is_some()
    }

    pub async fn save_edit(&self, id: &str, content: &str) -> bool {
        let content = match validate_comment(content) {
            Ok(content) => content,
            Err(errors) => {
                self.fail(errors);
                return false;
            }
        };

        let previous = self.lock().list.items_mut().update_item(id, |c| {
            c.editing = false;
            std::mem::replace(&mut c.content, content.clone())
        });
        let Some(previous) = previous else {
            self.fail(format!("Comment {id} is not loaded"));
            return false;
        };

        match self.comments.update(id, &content).await {
            Ok(comment) => {
                let mut state = self.lock();
                state.list.items_mut().set(id, comment);
                state.error = None;
                true
            }
            Err(e) => {
                let mut state = self.lock();
                let rolled_back = state.list.items_mut().update_item(id, |c| {
                    let untouched = c.content == content;
                    if untouched {
                        c.content = previous;
                        c.editing = true;
                    }
                    untouched
                });
                if rolled_back == Some(true) {
                    tracing::warn!("Edit of comment {} rejected, rolling back", id);
                }
                drop(state);
                self.fail(e);
                false
            }
        }
    }

    /// Delete `id` once the server confirms.
    pub async fn delete_comment(&self, id: &str) -> bool {
        match self.comments.delete(id).await {
            Ok(()) => {
                let mut state = self.lock();
                state.list.remove(id);
                state.error = None;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{comment_json, page_json, signed_in};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller(server: &MockServer) -> CommentsController {
        CommentsController::new(Comments::new(signed_in(server, "u1")), "p1", 2)
    }

    async fn mount_first_page(server: &MockServer, total: u64) {
        Mock::given(method("GET"))
            .and(path("/comments/post/p1"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![comment_json("c1", "p1", "first"), comment_json("c2", "p1", "second")],
                total,
            )))
            .expect(1)
            .mount(server)
            .await;
    }

    fn contents(snapshot: &CommentsSnapshot) -> Vec<&str> {
        snapshot.comments.iter().map(|c| c.content.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_merge() {
        let server = MockServer::start().await;
        mount_first_page(&server, 3).await;
        Mock::given(method("GET"))
            .and(path("/comments/post/p1"))
            .and(query_param("skip", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![comment_json("c3", "p1", "third")], 3)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let thread = controller(&server);
        assert!(thread.load_first_page().await);
        assert!(thread.load_next_page().await);
        assert!(!thread.load_next_page().await);

        let snapshot = thread.snapshot();
        assert_eq!(contents(&snapshot), ["first", "second", "third"]);
        assert!(!snapshot.has_more);
    }

    #[tokio::test]
    async fn test_add_appends_and_counts() {
        let server = MockServer::start().await;
        mount_first_page(&server, 2).await;
        Mock::given(method("POST"))
            .and(path("/comments"))
            .respond_with(ResponseTemplate::new(201).set_body_json(comment_json("c9", "p1", "new")))
            .expect(1)
            .mount(&server)
            .await;

        let thread = controller(&server);
        thread.load_first_page().await;
        let added = thread.add_comment(" new ").await.unwrap();
        assert_eq!(added.id, "c9");

        let snapshot = thread.snapshot();
        assert_eq!(contents(&snapshot), ["first", "second", "new"]);
        assert_eq!(snapshot.total, 3);
    }

    #[tokio::test]
    async fn test_blank_comment_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let thread = controller(&server);
        assert!(thread.add_comment("   ").await.is_none());
        assert_eq!(thread.snapshot().error.as_deref(), Some("Comment is required"));
    }

    #[tokio::test]
    async fn test_edit_flag_is_independent_of_saving() {
        let server = MockServer::start().await;
        mount_first_page(&server, 2).await;

        let thread = controller(&server);
        thread.load_first_page().await;

        assert!(thread.begin_edit("c1"));
        assert!(thread.snapshot().comments[0].editing);
        assert!(thread.cancel_edit("c1"));
        let snapshot = thread.snapshot();
        assert!(!snapshot.comments[0].editing);
        assert_eq!(snapshot.comments[0].content, "first");
        assert!(!thread.begin_edit("missing"));
    }

    #[tokio::test]
    async fn test_save_edit_reconciles() {
        let server = MockServer::start().await;
        mount_first_page(&server, 2).await;
        Mock::given(method("PUT"))
            .and(path("/comments/c1"))
            .and(body_json(serde_json::json!({ "content": "edited" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(comment_json("c1", "p1", "edited")))
            .expect(1)
            .mount(&server)
            .await;

        let thread = controller(&server);
        thread.load_first_page().await;
        thread.begin_edit("c1");
        assert!(thread.save_edit("c1", "edited").await);

        let comment = &thread.snapshot().comments[0];
        assert_eq!(comment.content, "edited");
        assert!(!comment.editing);
    }

    #[tokio::test]
    async fn test_rejected_edit_rolls_back() {
        let server = MockServer::start().await;
        mount_first_page(&server, 2).await;
        Mock::given(method("PUT"))
            .and(path("/comments/c1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
            .expect(1)
            .mount(&server)
            .await;

        let thread = controller(&server);
        thread.load_first_page().await;
        thread.begin_edit("c1");
        assert!(!thread.save_edit("c1", "edited").await);

        let snapshot = thread.snapshot();
        assert_eq!(snapshot.comments[0].content, "first");
        assert!(snapshot.comments[0].editing);
        assert_eq!(snapshot.error.as_deref(), Some("server returned 500: nope"));
    }

    #[tokio::test]
    async fn test_delete_after_confirmation() {
        let server = MockServer::start().await;
        mount_first_page(&server, 2).await;
        Mock::given(method("DELETE"))
            .and(path("/comments/c2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/comments/c1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let thread = controller(&server);
        thread.load_first_page().await;

        assert!(thread.delete_comment("c2").await);
        assert!(!thread.delete_comment("c1").await);

        let snapshot = thread.snapshot();
        assert_eq!(contents(&snapshot), ["first"]);
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.error.as_deref(), Some("not found: /comments/c1"));
    }
}
