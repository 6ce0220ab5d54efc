//! # UI crate: view-facing controllers
//!
//! Everything a view needs to render the Postwall client and drive it, with no
//! rendering of its own. Views read snapshots and call controller operations;
//! controllers talk to the backend through the `api` services.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collection`] | [`PaginatedCollection`]: ordered, identifier-deduplicated items plus the server total |
//! | [`paging`] | Idle / Loading / Error machine, page cursor and stale-response generations |
//! | [`feed`] | [`FeedController`]: post list, author scope, optimistic likes, post CRUD |
//! | [`comments`] | [`CommentsController`]: comment thread, optimistic edits |
//! | [`auth`] | [`AuthController`]: sign-in, sign-up, sign-out, profile |
//! | [`forms`] | Client-side validation; invalid input never reaches the network |
//! | [`context`] | [`AppContext`]: config + session + client, and controller constructors |
//!
//! Controllers are `Clone` handles over shared state. Their locks are only held
//! for bookkeeping between awaits, so a view and a background task can drive
//! the same controller at once.

pub mod auth;
pub mod collection;
pub mod comments;
pub mod context;
pub mod feed;
pub mod forms;
pub mod paging;

mod backend;
pub use backend::{session_backend, APP_DIR};
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub use backend::session_dir;

pub use auth::{AuthController, AuthState};
pub use collection::PaginatedCollection;
pub use comments::{CommentsController, CommentsSnapshot};
pub use context::AppContext;
pub use feed::{FeedController, FeedScope, FeedSnapshot};
pub use forms::{FormErrors, LoginForm, NewPostForm, ProfileForm, SignUpForm};
pub use paging::{LoadRequest, LoadState};

#[cfg(test)]
mod test_support;
