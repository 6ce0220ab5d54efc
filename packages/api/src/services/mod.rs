//! REST resource services.
//!
//! Each service is a thin, cloneable handle over a shared [`HttpClient`]; it
//! builds paths, queries and bodies and decodes the response, nothing more.
//!
//! [`HttpClient`]: crate::HttpClient

mod auth;
mod comments;
mod posts;
mod users;

pub use auth::Auth;
pub use comments::Comments;
pub use posts::Posts;
pub use users::{Users, USERNAME_TAKEN};

use crate::error::ApiError;

/// Pagination cursor query. `limit` must be positive.
pub(crate) fn page_query(skip: u32, limit: u32) -> Result<Vec<(&'static str, String)>, ApiError> {
    if limit == 0 {
        return Err(ApiError::Validation("limit must be greater than zero".to_string()));
    }
    Ok(vec![("skip", skip.to_string()), ("limit", limit.to_string())])
}
