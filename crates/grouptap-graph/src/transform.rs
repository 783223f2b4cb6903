//! Post + comment flattening: nested records → [`CommentRow`]

use serde::{Deserialize, Serialize};

use crate::api::GraphTransport;
use crate::error::GraphError;
use crate::fetch::{
    DEFAULT_COMMENT_ORDER, DEFAULT_PAGE_SIZE, PostQuery, iterate_comments, iterate_posts,
};
use crate::paging::Paginator;
use crate::record::{Comment, Post};

/// One output row: a comment joined with its parent post.
///
/// Field order is the column order (see [`COLUMNS`](crate::COLUMNS)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRow {
    pub post_id: String,
    pub post_message: String,
    pub post_created_time: String,
    pub comment_id: String,
    pub comment_message: String,
    pub comment_created_time: String,
    pub comment_author_id: String,
    pub comment_author_name: String,
    pub comment_like_count: u64,
    pub comment_reply_count: u64,
}

impl CommentRow {
    /// Missing or null text becomes `""`, missing or null counts become `0`,
    /// a missing author becomes an empty id/name pair.
    pub fn from_parts(post: &Post, comment: Comment) -> Self {
        let author = comment.from.unwrap_or_default();
        Self {
            post_id: post.id.clone().unwrap_or_default(),
            post_message: post.message.clone().unwrap_or_default(),
            post_created_time: post.created_time.clone().unwrap_or_default(),
            comment_id: comment.id.unwrap_or_default(),
            comment_message: comment.message.unwrap_or_default(),
            comment_created_time: comment.created_time.unwrap_or_default(),
            comment_author_id: author.id.unwrap_or_default(),
            comment_author_name: author.name.unwrap_or_default(),
            comment_like_count: comment.like_count.unwrap_or(0),
            comment_reply_count: comment.comment_count.unwrap_or(0),
        }
    }
}

/// Post walk plus per-post comment settings
#[derive(Debug, Clone)]
pub struct ExportQuery {
    pub posts: PostQuery,
    pub comment_limit: u32,
    /// Upstream comment sort directive
    pub order: String,
}

impl ExportQuery {
    pub fn new(posts: PostQuery) -> Self {
        Self {
            posts,
            comment_limit: DEFAULT_PAGE_SIZE,
            order: DEFAULT_COMMENT_ORDER.to_string(),
        }
    }
}

struct OpenPost<'a, C: GraphTransport + ?Sized> {
    post: Post,
    comments: Paginator<'a, C, Comment>,
}

/// Lazy row sequence: posts in feed order, each followed by its comments
/// in upstream order. No deduplication.
pub struct CommentRows<'a, C: GraphTransport + ?Sized> {
    client: &'a C,
    posts: Paginator<'a, C, Post>,
    current: Option<OpenPost<'a, C>>,
    comment_limit: u32,
    order: String,
    posts_seen: usize,
    failed: bool,
}

/// Start the two-level walk. Nothing is requested until the first `next()`.
pub fn collect_rows<'a, C: GraphTransport + ?Sized>(
    client: &'a C,
    query: &ExportQuery,
) -> Result<CommentRows<'a, C>, GraphError> {
    if query.comment_limit == 0 {
        return Err(GraphError::InvalidArgument(
            "comment page size must be positive".into(),
        ));
    }
    Ok(CommentRows {
        client,
        posts: iterate_posts(client, &query.posts)?,
        current: None,
        comment_limit: query.comment_limit,
        order: query.order.clone(),
        posts_seen: 0,
        failed: false,
    })
}

impl<C: GraphTransport + ?Sized> CommentRows<'_, C> {
    /// Posts pulled from the feed so far
    pub fn posts_seen(&self) -> usize {
        self.posts_seen
    }

    fn fail(&mut self, e: GraphError) -> Option<Result<CommentRow, GraphError>> {
        self.failed = true;
        self.current = None;
        Some(Err(e))
    }
}

impl<C: GraphTransport + ?Sized> Iterator for CommentRows<'_, C> {
    type Item = Result<CommentRow, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if let Some(open) = self.current.as_mut() {
                match open.comments.next() {
                    Some(Ok(comment)) => {
                        return Some(Ok(CommentRow::from_parts(&open.post, comment)));
                    }
                    Some(Err(e)) => return self.fail(e),
                    None => {
                        log::debug!(
                            "post {}: {} comments",
                            open.post.id.as_deref().unwrap_or_default(),
                            open.comments.yielded()
                        );
                        self.current = None;
                    }
                }
            }

            let post = match self.posts.next()? {
                Ok(post) => post,
                Err(e) => return self.fail(e),
            };
            self.posts_seen += 1;

            let Some(post_id) = post.id.clone().filter(|id| !id.trim().is_empty()) else {
                log::warn!("skipping feed entry without an id");
                continue;
            };
            match iterate_comments(self.client, &post_id, self.comment_limit, &self.order) {
                Ok(comments) => self.current = Some(OpenPost { post, comments }),
                Err(e) => return self.fail(e),
            }
        }
    }
}
