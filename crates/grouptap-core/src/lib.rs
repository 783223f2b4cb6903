//! Grouptap Core - Common infrastructure for the comment export pipeline
//!
//! This crate provides the blocking HTTP bridge, the CSV output sink,
//! and the logging/progress plumbing shared by the fetcher and the CLI.

pub mod http;
pub mod logging;
pub mod progress;
pub mod sink;

// Re-exports for convenience
pub use http::{HttpResponse, SHARED_RUNTIME, StreamError, build_http_client, get_text};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
pub use sink::CsvSink;
