//! Wire records as returned by the feed and comments edges.
//!
//! Every field is optional: upstream omits fields it has no value for and
//! sometimes sends explicit nulls. Defaults are applied in one place,
//! [`CommentRow::from_parts`](crate::CommentRow::from_parts).

use serde::Deserialize;

/// Group feed entry (`fields=id,message,created_time`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
}

/// Comment on a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub from: Option<Author>,
    #[serde(default)]
    pub like_count: Option<u64>,
    /// Number of replies to this comment
    #[serde(default)]
    pub comment_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
