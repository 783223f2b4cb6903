//! Post and comment walks over the group feed and comment edges

use crate::api::GraphTransport;
use crate::error::GraphError;
use crate::paging::Paginator;
use crate::record::{Comment, Post};

pub const POST_FIELDS: &str = "id,message,created_time";
pub const COMMENT_FIELDS: &str = "id,message,created_time,from,like_count,comment_count";

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_COMMENT_ORDER: &str = "chronological";

/// Group feed query
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub group_id: String,
    /// Page size hint; upstream may return fewer
    pub limit: u32,
    /// Passed through uninterpreted (ISO8601 or Unix epoch)
    pub since: Option<String>,
    pub until: Option<String>,
    /// Cap on posts yielded across all pages
    pub max_count: Option<usize>,
}

impl PostQuery {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            limit: DEFAULT_PAGE_SIZE,
            since: None,
            until: None,
            max_count: None,
        }
    }
}

/// Lazy walk over `{group_id}/feed`.
///
/// Each call starts over with a fresh first request.
pub fn iterate_posts<'a, C: GraphTransport + ?Sized>(
    client: &'a C,
    query: &PostQuery,
) -> Result<Paginator<'a, C, Post>, GraphError> {
    let group_id = non_empty("group id", &query.group_id)?;
    let limit = positive_limit(query.limit)?;

    let mut params = vec![
        ("limit".to_string(), limit),
        ("fields".to_string(), POST_FIELDS.to_string()),
    ];
    // empty filter values are omitted
    for (key, value) in [("since", &query.since), ("until", &query.until)] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            params.push((key.to_string(), value.to_string()));
        }
    }

    Ok(Paginator::new(
        client,
        format!("{group_id}/feed"),
        params,
        query.max_count,
    ))
}

/// Lazy walk over `{post_id}/comments`.
///
/// `order` is an upstream sort directive (`chronological`,
/// `reverse_chronological`) and is not checked here. No time filters apply.
pub fn iterate_comments<'a, C: GraphTransport + ?Sized>(
    client: &'a C,
    post_id: &str,
    limit: u32,
    order: &str,
) -> Result<Paginator<'a, C, Comment>, GraphError> {
    let post_id = non_empty("post id", post_id)?;
    let params = vec![
        ("limit".to_string(), positive_limit(limit)?),
        ("order".to_string(), order.to_string()),
        ("fields".to_string(), COMMENT_FIELDS.to_string()),
    ];
    Ok(Paginator::new(
        client,
        format!("{post_id}/comments"),
        params,
        None,
    ))
}

fn non_empty<'s>(what: &str, value: &'s str) -> Result<&'s str, GraphError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GraphError::InvalidArgument(format!("{what} is empty")));
    }
    Ok(value)
}

fn positive_limit(limit: u32) -> Result<String, GraphError> {
    if limit == 0 {
        return Err(GraphError::InvalidArgument(
            "page size must be positive".into(),
        ));
    }
    Ok(limit.to_string())
}
