//! Graph API client

use std::time::Duration;

use grouptap_core::{build_http_client, get_text};
use url::Url;

use crate::error::GraphError;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v19.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_PARAM: &str = "access_token";

/// Low-level GET primitive shared by every paginated walk.
///
/// `path` is either relative to [`base_url`](Self::base_url) (and may carry
/// its own query string) or an absolute URL. Implementations return the raw
/// body of a 200 response and map anything else to [`GraphError`].
pub trait GraphTransport {
    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, GraphError>;

    /// Versioned API root, e.g. `https://graph.facebook.com/v19.0`
    fn base_url(&self) -> &str;
}

/// Endpoint and deadline for [`GraphClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientSettings {
    /// `{base_url}/{api_version}` without a trailing slash
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{version}")
        }
    }
}

/// Blocking graph API client. Attaches the access token to every request.
pub struct GraphClient {
    http: reqwest::Client,
    api_root: String,
    access_token: String,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    pub fn new(settings: &ClientSettings, access_token: impl Into<String>) -> Result<Self, GraphError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(GraphError::InvalidArgument("access token is empty".into()));
        }
        Ok(Self {
            http: build_http_client(settings.timeout)?,
            api_root: settings.api_root(),
            access_token,
        })
    }

    /// Resolve `path` against the API root and append query parameters.
    ///
    /// The token is only added when the path does not already carry one;
    /// upstream `next` links embed it.
    pub fn request_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, GraphError> {
        let raw = if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}/{}", self.api_root, path.trim_start_matches('/'))
        };
        let mut url = Url::parse(&raw)
            .map_err(|e| GraphError::InvalidArgument(format!("bad request URL {raw:?}: {e}")))?;

        let has_token = url.query_pairs().any(|(k, _)| k == TOKEN_PARAM);
        if !params.is_empty() || !has_token {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if !has_token {
                query.append_pair(TOKEN_PARAM, &self.access_token);
            }
        }
        Ok(url)
    }
}

impl GraphTransport for GraphClient {
    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, GraphError> {
        let url = self.request_url(path, params)?;
        log::debug!("GET {}", redact_token(&url));

        let response = get_text(&self.http, url)?;
        if !response.is_success() {
            return Err(GraphError::from_status(response.status, &response.body));
        }
        Ok(response.body)
    }

    fn base_url(&self) -> &str {
        &self.api_root
    }
}

/// URL string with the access token value masked, for logging
pub fn redact_token(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == TOKEN_PARAM { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
