//! Error type for graph API calls and page decoding

use grouptap_core::StreamError;
use serde::Deserialize;

/// Error from one graph API call.
///
/// Any of these ends the pagination sequence that produced it; nothing is
/// retried.
#[derive(Debug)]
pub enum GraphError {
    /// Connection failure or request deadline exceeded
    Transport(StreamError),
    /// Non-200 response; `message` is the upstream error message when available
    Http { status: u16, message: String },
    /// 200 response carrying an `{"error": {...}}` envelope
    Api { message: String },
    /// Body is not JSON, or not shaped like a page
    Decode { reason: String, body: String },
    /// Rejected locally before any request was made
    InvalidArgument(String),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{e}"),
            Self::Http { status, message } => {
                write!(f, "Graph API request failed ({status}): {message}")
            }
            Self::Api { message } => write!(f, "Graph API error: {message}"),
            Self::Decode { reason, body } => {
                write!(f, "Invalid JSON from Graph API ({reason}): {body}")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for GraphError {
    fn from(e: StreamError) -> Self {
        Self::Transport(e)
    }
}

/// `{"error": {"message": ..., "type": ..., "code": ...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

impl ApiErrorBody {
    /// Human-readable message, falling back to type/code when upstream sent no text
    pub fn describe(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
        match (&self.kind, self.code) {
            (Some(kind), Some(code)) => format!("{kind} (code {code})"),
            (Some(kind), None) => kind.clone(),
            (None, Some(code)) => format!("code {code}"),
            (None, None) => "unknown error".to_string(),
        }
    }
}

impl GraphError {
    /// Build the error for a non-200 response.
    ///
    /// Extracts `error.message` from the body when it parses, otherwise the
    /// raw body text is used.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .map(|e| e.describe())
            .unwrap_or_else(|| body.to_string());
        Self::Http { status, message }
    }

    pub fn decode(reason: impl std::fmt::Display, body: &str) -> Self {
        Self::Decode {
            reason: reason.to_string(),
            body: body.to_string(),
        }
    }
}
