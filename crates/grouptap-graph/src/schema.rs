//! Output column layout

/// CSV header, in output order.
///
/// Must match the field order of [`CommentRow`](crate::CommentRow), which is
/// serialized positionally.
pub const COLUMNS: [&str; 10] = [
    "post_id",
    "post_message",
    "post_created_time",
    "comment_id",
    "comment_message",
    "comment_created_time",
    "comment_author_id",
    "comment_author_name",
    "comment_like_count",
    "comment_reply_count",
];
