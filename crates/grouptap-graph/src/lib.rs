//! Grouptap Graph - group comment export over a cursor-paginated graph API
//!
//! Walks group posts and their comments page by page, flattens each
//! comment into a [`CommentRow`] and streams the rows into a CSV sink.

pub mod api;
pub mod error;
pub mod fetch;
pub mod paging;
pub mod record;
pub mod runner;
pub mod schema;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use api::{ClientSettings, GraphClient, GraphTransport};
pub use error::GraphError;
pub use fetch::{PostQuery, iterate_comments, iterate_posts};
pub use paging::Paginator;
pub use record::{Author, Comment, Post};
pub use runner::{ExportConfig, ExportStats, run_export};
pub use schema::COLUMNS;
pub use transform::{CommentRow, CommentRows, ExportQuery, collect_rows};
