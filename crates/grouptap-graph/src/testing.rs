//! Scripted in-memory transport for pagination tests

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{Value, json};

use crate::api::GraphTransport;
use crate::error::GraphError;

pub const FAKE_ROOT: &str = "https://graph.test/v19.0";

enum Reply {
    Body(String),
    Status(u16, String),
}

/// Requested path and its query parameters
type Call = (String, Vec<(String, String)>);

/// Routes requests by path (including any query string carried by a
/// `next` link) and records every call in order.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, Reply>,
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: Value) -> Self {
        self.routes
            .insert(path.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn raw(mut self, path: &str, body: &str) -> Self {
        self.routes
            .insert(path.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(path.to_string(), Reply::Status(status, body.to_string()));
        self
    }

    /// Paths requested so far, in order
    pub fn paths(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Query parameters of the n-th request
    pub fn params(&self, n: usize) -> Vec<(String, String)> {
        self.calls.borrow()[n].1.clone()
    }
}

impl GraphTransport for FakeTransport {
    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, GraphError> {
        self.calls.borrow_mut().push((
            path.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        match self.routes.get(path) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status, body)) => Err(GraphError::from_status(*status, body)),
            None => Err(GraphError::from_status(404, &format!("no route for {path}"))),
        }
    }

    fn base_url(&self) -> &str {
        FAKE_ROOT
    }
}

/// Page body continuing to `next_path` (relative to [`FAKE_ROOT`]) via cursor `after`
pub fn page_to(data: Value, after: &str, next_path: &str) -> Value {
    json!({
        "data": data,
        "paging": {
            "cursors": { "before": "b", "after": after },
            "next": format!("{FAKE_ROOT}/{next_path}"),
        }
    })
}

/// Terminal page: no `after` cursor, no `next`
pub fn last_page(data: Value) -> Value {
    json!({ "data": data, "paging": { "cursors": { "before": "b" } } })
}

/// `n` posts with ids `{prefix}{i}`
pub fn posts(prefix: &str, range: std::ops::Range<usize>) -> Value {
    Value::Array(
        range
            .map(|i| json!({ "id": format!("{prefix}{i}"), "message": format!("post {i}") }))
            .collect(),
    )
}
