//! # Feed controller
//!
//! [`FeedController`] owns the paginated post list a view renders, optionally
//! scoped to one author, plus a "selected" slot for a single post page.
//!
//! | Operation | Network | Local effect |
//! |-----------|---------|--------------|
//! | [`load`](FeedController::load) / [`set_scope`](FeedController::set_scope) / [`refresh`](FeedController::refresh) | `GET /posts` | replace or merge a page |
//! | [`load_next_page`](FeedController::load_next_page) | `GET /posts` | merge page + 1, only if more exist and nothing is in flight |
//! | [`toggle_like`](FeedController::toggle_like) | `PUT /posts/:id` | optimistic, rolled back on failure |
//! | [`create_post`](FeedController::create_post) | `POST /posts` | prepend the server copy |
//! | [`update_post`](FeedController::update_post), [`set_image`](FeedController::set_image), [`clear_image`](FeedController::clear_image) | `PUT` | replace in place |
//! | [`delete_post`](FeedController::delete_post) | `DELETE /posts/:id` | remove after the server confirms |
//! | [`fetch_post`](FeedController::fetch_post) | `GET /posts/:id` | fill the selected slot |
//!
//! Operations never return errors. Failures are logged and stored as a message
//! the view reads from [`FeedSnapshot::error`]; the next successful operation
//! clears it.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::{toggle_like, ImageUpload, Post, PostUpdate, Posts, SessionStore};

use crate::forms::NewPostForm;
use crate::paging::{LoadOutcome, LoadRequest, LoadState, LoadTicket, PagedList};

/// Which posts the feed lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedScope {
    #[default]
    All,
    Author(String),
}

impl FeedScope {
    pub fn author(&self) -> Option<&str> {
        match self {
            FeedScope::All => None,
            FeedScope::Author(id) => Some(id),
        }
    }

    pub fn includes(&self, post: &Post) -> bool {
        self.author().map_or(true, |id| post.author_id == id)
    }
}

/// What a view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub has_more: bool,
    pub load_state: LoadState,
    pub scope: FeedScope,
    pub selected: Option<Post>,
    pub error: Option<String>,
}

impl FeedSnapshot {
    pub fn loading(&self) -> bool {
        self.load_state.is_loading()
    }
}

struct FeedState {
    list: PagedList<Post>,
    scope: FeedScope,
    selected: Option<Post>,
    error: Option<String>,
}

impl FeedState {
    fn likes_of(&self, id: &str) -> Option<BTreeSet<String>> {
        self.list
            .items()
            .get(id)
            .or(self.selected.as_ref().filter(|p| p.id == id))
            .map(|p| p.likes.clone())
    }

    fn set_likes(&mut self, id: &str, likes: &BTreeSet<String>) {
        self.list
            .items_mut()
            .update_item(id, |p| p.likes = likes.clone());
        if let Some(post) = self.selected.as_mut().filter(|p| p.id == id) {
            post.likes = likes.clone();
        }
    }

    /// Swap in the server copy wherever the post is shown.
    fn apply(&mut self, post: &Post) {
        self.list.items_mut().set(&post.id, post.clone());
        if let Some(selected) = self.selected.as_mut().filter(|p| p.id == post.id) {
            *selected = post.clone();
        }
        self.error = None;
    }
}

#[derive(Clone)]
pub struct FeedController {
    posts: Posts,
    session: SessionStore,
    state: Arc<Mutex<FeedState>>,
}

impl FeedController {
    pub fn new(posts: Posts, session: SessionStore, page_size: u32) -> Self {
        Self {
            posts,
            session,
            state: Arc::new(Mutex::new(FeedState {
                list: PagedList::new(page_size),
                scope: FeedScope::All,
                selected: None,
                error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, message: impl Display) {
        let message = message.to_string();
        tracing::error!("Feed: {}", message);
        self.lock().error = Some(message);
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock();
        FeedSnapshot {
            posts: state.list.items().items().to_vec(),
            total: state.list.items().total(),
            page: state.list.page(),
            has_more: state.list.items().has_more(),
            load_state: state.list.state().clone(),
            scope: state.scope.clone(),
            selected: state.selected.clone(),
            error: state.error.clone(),
        }
    }

    pub fn scope(&self) -> FeedScope {
        self.lock().scope.clone()
    }

    /// Fetch one page. `append` merges into the current list; otherwise the
    /// list is replaced. A scope different from the current one always
    /// replaces from page zero, whatever `skip` says. Returns `true` if the
    /// page was applied.
    pub async fn load(&self, skip: u32, limit: u32, scope: FeedScope, append: bool) -> bool {
        let ticket = {
            let mut state = self.lock();
            let switching = state.scope != scope;
            if switching {
                tracing::debug!("Feed scope {:?} -> {:?}", state.scope, scope);
                state.list.reset();
                state.scope = scope.clone();
            }
            state.list.begin(LoadRequest {
                skip: if switching { 0 } else { skip },
                limit,
                append: append && !switching,
            })
        };
        self.run(ticket, scope).await
    }

    /// Reset to page zero of `scope`.
    pub async fn set_scope(&self, scope: FeedScope) -> bool {
        let limit = self.lock().list.page_size();
        self.load(0, limit, scope, false).await
    }

    /// Reload page zero of the current scope.
    pub async fn refresh(&self) -> bool {
        let scope = self.scope();
        self.set_scope(scope).await
    }

    /// Scroll trigger: load the next page if there is one and no load is
    /// running.
    pub async fn load_next_page(&self) -> bool {
        let next = {
            let mut state = self.lock();
            let scope = state.scope.clone();
            state.list.begin_next().map(|ticket| (ticket, scope))
        };
        match next {
            Some((ticket, scope)) => self.run(ticket, scope).await,
            None => false,
        }
    }

    /// Re-issue the page request that failed last.
    pub async fn retry(&self) -> bool {
        let retry = {
            let mut state = self.lock();
            let scope = state.scope.clone();
            state.list.begin_retry().map(|ticket| (ticket, scope))
        };
        match retry {
            Some((ticket, scope)) => self.run(ticket, scope).await,
            None => false,
        }
    }

    async fn run(&self, ticket: LoadTicket, scope: FeedScope) -> bool {
        let LoadRequest { skip, limit, .. } = ticket.request;
        let result = self.posts.list(skip, limit, scope.author()).await;

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

    /// Like or unlike `id` as the signed-in user. The new liker set is shown
    /// immediately; if the server rejects it the previous set is restored,
    /// unless another toggle has changed the post since.
    pub async fn toggle_like(&self, id: &str) -> bool {
        let Some(user_id) = self.session.user_id() else {
            self.fail("Sign in to like posts");
            return false;
        };

        let (previous, next) = {
            let mut state = self.lock();
            let Some(previous) = state.likes_of(id) else {
                drop(state);
                self.fail(format!("Post {id} is not loaded"));
                return false;
            };
            let next = toggle_like(&previous, &user_id);
            state.set_likes(id, &next);
            (previous, next)
        };

        match self.posts.update(id, &PostUpdate::likes(next.clone())).await {
            Ok(post) => {
                self.lock().apply(&post);
                true
            }
            Err(e) => {
                let mut state = self.lock();
                if state.likes_of(id).as_ref() == Some(&next) {
                    tracing::warn!("Like on {} rejected, rolling back", id);
                    state.set_likes(id, &previous);
                }
                let message = e.to_string();
                tracing::error!("Feed: {}", message);
                state.error = Some(message);
                false
            }
        }
    }

    /// Validate and publish a post. An invalid form sends nothing.
    pub async fn create_post(&self, form: &NewPostForm) -> Option<Post> {
        let new_post = match form.validate() {
            Ok(post) => post,
            Err(errors) => {
                self.fail(errors);
                return None;
            }
        };

        match self.posts.create(new_post).await {
            Ok(post) => {
                tracing::info!("Created post {}", post.id);
                let mut state = self.lock();
                if state.scope.includes(&post) {
                    state.list.items_mut().prepend(post.clone());
                }
                state.error = None;
                Some(post)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> Option<Post> {
        let result = self.posts.update(id, update).await;
        self.reconcile(result)
    }

    pub async fn set_image(&self, id: &str, image: ImageUpload) -> Option<Post> {
        let result = self.posts.set_image(id, image).await;
        self.reconcile(result)
    }

    pub async fn clear_image(&self, id: &str) -> Option<Post> {
        let result = self.posts.clear_image(id).await;
        self.reconcile(result)
    }

    fn reconcile(&self, result: Result<Post, api::ApiError>) -> Option<Post> {
        match result {
            Ok(post) => {
                self.lock().apply(&post);
                Some(post)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Delete `id`. The post stays listed until the server confirms.
    pub async fn delete_post(&self, id: &str) -> bool {
        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::info!("Deleted post {}", id);
                let mut state = self.lock();
                state.list.remove(id);
                if state.selected.as_ref().is_some_and(|p| p.id == id) {
                    state.selected = None;
                }
                state.error = None;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Load one post into the selected slot.
    pub async fn fetch_post(&self, id: &str) -> Option<Post> {
        match self.posts.get(id).await {
            Ok(post) => {
                let mut state = self.lock();
                state.selected = Some(post.clone());
                state.apply(&post);
                Some(post)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    pub fn clear_selected(&self) {
        self.lock().selected = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::{page_json, post_json, signed_in, signed_out};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn feed(client: Arc<api::HttpClient>, page_size: u32) -> FeedController {
        let session = client.session().clone();
        FeedController::new(Posts::new(client), session, page_size)
    }

    fn ids(snapshot: &FeedSnapshot) -> Vec<&str> {
        snapshot.posts.iter().map(|p| p.id.as_str()).collect()
    }

    async fn mount_page(server: &MockServer, skip: &str, items: &[&str], total: u64) {
        let items = items.iter().map(|id| post_json(id, "u1", &[])).collect();
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("skip", skip))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(items, total)))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_post(server: &MockServer, id: &str, likes: &[&str]) {
        Mock::given(method("GET"))
            .and(path(format!("/posts/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(id, "u2", likes)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_scroll_loads_each_page_once() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 5).await;
        mount_page(&server, "2", &["c", "d"], 5).await;
        mount_page(&server, "4", &["e"], 5).await;

        let feed = feed(signed_out(&server), 2);
        assert!(feed.refresh().await);
        assert!(feed.load_next_page().await);
        assert!(feed.load_next_page().await);
        // Everything is loaded; the trigger is a no-op.
        assert!(!feed.load_next_page().await);

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b", "c", "d", "e"]);
        assert_eq!(snapshot.page, 2);
        assert!(!snapshot.has_more);
        assert!(!snapshot.loading());
    }

    #[tokio::test]
    async fn test_overlapping_page_does_not_duplicate() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 4).await;
        mount_page(&server, "2", &["b", "c"], 4).await;

        let feed = feed(signed_out(&server), 2);
        feed.refresh().await;
        feed.load_next_page().await;

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b", "c"]);
        assert!(snapshot.has_more);
    }

    #[tokio::test]
    async fn test_scope_switch_resets_to_page_zero() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 4).await;
        mount_page(&server, "2", &["c", "d"], 4).await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("sender", "u2"))
            .and(query_param("skip", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![post_json("x", "u2", &[])], 1)),
            )
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_out(&server), 2);
        feed.refresh().await;
        feed.load_next_page().await;
        assert_eq!(feed.snapshot().page, 1);

        assert!(feed.set_scope(FeedScope::Author("u2".into())).await);
        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["x"]);
        assert_eq!(snapshot.page, 0);
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.scope, FeedScope::Author("u2".into()));
    }

    #[tokio::test]
    async fn test_scope_switch_ignores_requested_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("sender", "u2"))
            .and(query_param("skip", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![post_json("x", "u2", &[])], 30)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_out(&server), 10);
        assert!(feed.load(20, 10, FeedScope::Author("u2".into()), true).await);

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["x"]);
        assert_eq!(snapshot.page, 0);
    }

    #[tokio::test]
    async fn test_stale_scope_response_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("sender", "u2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![post_json("mine", "u2", &[])], 1)),
            )
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![post_json("old", "u1", &[])], 1))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let feed = feed(signed_out(&server), 10);
        let slow = feed.clone();
        let fast = feed.clone();
        let (old, new) = tokio::join!(slow.load(0, 10, FeedScope::All, false), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fast.set_scope(FeedScope::Author("u2".into())).await
        });

        assert!(!old);
        assert!(new);
        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["mine"]);
        assert_eq!(snapshot.scope, FeedScope::Author("u2".into()));
        assert!(!snapshot.loading());
    }

    #[tokio::test]
    async fn test_failed_page_keeps_items_and_retries() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 4).await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("skip", "2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_page(&server, "2", &["c", "d"], 4).await;

        let feed = feed(signed_out(&server), 2);
        feed.refresh().await;
        assert!(!feed.load_next_page().await);

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("server returned 500: boom"));
        assert_eq!(snapshot.load_state.error(), Some("server returned 500: boom"));
        assert_eq!(ids(&snapshot), ["a", "b"]);

        assert!(feed.retry().await);
        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b", "c", "d"]);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_like_twice_restores_set_with_two_requests() {
        let server = MockServer::start().await;
        mount_post(&server, "p1", &["u2"]).await;
        Mock::given(method("PUT"))
            .and(path("/posts/p1"))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                let likes: Vec<&str> = body["usersIdLikes"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|v| v.as_str().unwrap())
                    .collect();
                ResponseTemplate::new(200).set_body_json(post_json("p1", "u2", &likes))
            })
            .expect(2)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.fetch_post("p1").await.unwrap();

        assert!(feed.toggle_like("p1").await);
        let liked = feed.snapshot().selected.unwrap();
        assert!(liked.is_liked_by("me"));
        assert_eq!(liked.like_count(), 2);

        assert!(feed.toggle_like("p1").await);
        let unliked = feed.snapshot().selected.unwrap();
        assert_eq!(unliked.likes, BTreeSet::from(["u2".to_string()]));
    }

    #[tokio::test]
    async fn test_rejected_like_rolls_back() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["p1"], 1).await;
        Mock::given(method("PUT"))
            .and(path("/posts/p1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.refresh().await;
        assert!(!feed.toggle_like("p1").await);

        let snapshot = feed.snapshot();
        assert!(snapshot.posts[0].likes.is_empty());
        assert_eq!(snapshot.error.as_deref(), Some("server returned 500: db down"));
    }

    #[tokio::test]
    async fn test_failed_like_keeps_later_toggle() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["p1"], 1).await;
        Mock::given(method("PUT"))
            .and(path("/posts/p1"))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                let likes_me = body["usersIdLikes"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .any(|v| v == "me");
                if likes_me {
                    ResponseTemplate::new(500)
                        .set_body_string("db down")
                        .set_delay(Duration::from_millis(300))
                } else {
                    // Someone else liked it in the meantime.
                    ResponseTemplate::new(200).set_body_json(post_json("p1", "u1", &["u3"]))
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.refresh().await;

        let first = feed.clone();
        let second = feed.clone();
        let (liked, unliked) = tokio::join!(first.toggle_like("p1"), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            second.toggle_like("p1").await
        });

        assert!(!liked);
        assert!(unliked);
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.posts[0].likes, BTreeSet::from(["u3".to_string()]));
        assert_eq!(snapshot.error.as_deref(), Some("server returned 500: db down"));
    }

    #[tokio::test]
    async fn test_like_requires_session() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["p1"], 1).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let feed = feed(signed_out(&server), 10);
        feed.refresh().await;
        assert!(!feed.toggle_like("p1").await);
        assert_eq!(feed.snapshot().error.as_deref(), Some("Sign in to like posts"));
    }

    #[tokio::test]
    async fn test_empty_title_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        let form = NewPostForm {
            title: "  ".into(),
            content: "body".into(),
            image: None,
        };
        assert!(feed.create_post(&form).await.is_none());
        assert_eq!(feed.snapshot().error.as_deref(), Some("Title is required"));
    }

    #[tokio::test]
    async fn test_created_post_is_prepended() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 2).await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(post_json("new", "me", &[])))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.refresh().await;
        let form = NewPostForm {
            title: "Hello".into(),
            content: "World".into(),
            image: None,
        };
        let post = feed.create_post(&form).await.unwrap();
        assert_eq!(post.id, "new");

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["new", "a", "b"]);
        assert_eq!(snapshot.total, 3);
    }

    #[tokio::test]
    async fn test_delete_waits_for_server() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 2).await;
        Mock::given(method("DELETE"))
            .and(path("/posts/a"))
            .respond_with(ResponseTemplate::new(403).set_body_string("not yours"))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/posts/a"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.refresh().await;

        assert!(!feed.delete_post("a").await);
        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b"]);
        assert!(snapshot.error.is_some());

        assert!(feed.delete_post("a").await);
        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["b"]);
        assert_eq!(snapshot.total, 1);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_scroll_after_delete_loads_shifted_page() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 4).await;
        // With "a" gone the server holds b, c, d.
        mount_page(&server, "1", &["c", "d"], 3).await;
        Mock::given(method("DELETE"))
            .and(path("/posts/a"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 2);
        feed.refresh().await;
        assert!(feed.delete_post("a").await);

        assert!(feed.load_next_page().await);
        assert!(!feed.load_next_page().await);

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["b", "c", "d"]);
        assert_eq!(snapshot.total, 3);
        assert!(!snapshot.has_more);
    }

    #[tokio::test]
    async fn test_clear_image_replaces_in_place() {
        let server = MockServer::start().await;
        mount_page(&server, "0", &["a", "b"], 2).await;
        let mut cleared = post_json("a", "u1", &[]);
        cleared["title"] = "edited".into();
        Mock::given(method("PUT"))
            .and(path("/posts/removeImage/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cleared))
            .expect(1)
            .mount(&server)
            .await;

        let feed = feed(signed_in(&server, "me"), 10);
        feed.refresh().await;
        feed.clear_image("a").await.unwrap();

        let snapshot = feed.snapshot();
        assert_eq!(ids(&snapshot), ["a", "b"]);
        assert_eq!(snapshot.posts[0].title, "edited");
    }
}
