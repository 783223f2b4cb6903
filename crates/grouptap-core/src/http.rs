//! Blocking HTTP GET over a shared tokio runtime.
//!
//! Uses async reqwest internally but presents a sync interface, so the
//! pagination iterators can pull one page at a time from plain sync code.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error types for transport operations
#[derive(Debug)]
pub enum StreamError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Request deadline exceeded
    Timeout { message: String },
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Timeout { message } => write!(f, "request timed out: {message}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl StreamError {
    /// Create transport error from reqwest error.
    ///
    /// The URL is dropped: request URLs carry the access token.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        let is_timeout = e.is_timeout();
        let message = e.without_url().to_string();
        if is_timeout {
            Self::Timeout { message }
        } else {
            Self::Http { status, message }
        }
    }
}

/// Status code and full body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Shared tokio runtime for HTTP operations.
///
/// Callers block on each request, so at most one is in flight per caller.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Build an HTTP client with one fixed overall deadline per request.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, StreamError> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .user_agent(concat!("grouptap/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(StreamError::from_reqwest)
}

/// HTTP GET → status + body text.
///
/// Non-success statuses are returned as-is; interpreting them is up to the
/// caller, which knows the upstream error envelope.
pub fn get_text(client: &reqwest::Client, url: reqwest::Url) -> Result<HttpResponse, StreamError> {
    SHARED_RUNTIME.block_on(async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(StreamError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(StreamError::from_reqwest)?;
        Ok(HttpResponse { status, body })
    })
}
