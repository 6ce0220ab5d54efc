use serde::{Deserialize, Serialize};

use super::{require_non_empty, Identified, Schema};

/// A comment on a post.
///
/// `editing` is view state only: it is never serialised and always starts
/// `false` for comments decoded from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    #[serde(rename = "senderId")]
    pub author_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "senderName", default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(rename = "senderProfile", default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    #[serde(skip)]
    pub editing: bool,
}

impl Identified for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for Comment {
    fn check(self) -> Result<Self, String> {
        require_non_empty("comment", "_id", &self.id)?;
        require_non_empty("comment", "postId", &self.post_id)?;
        Ok(self)
    }
}
