//! Cursor pagination: one lazy record sequence over many pages

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::GraphTransport;
use crate::error::{ApiErrorBody, GraphError};

/// One API response: a batch of records plus paging metadata
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
pub struct Page<R> {
    #[serde(default = "Vec::new")]
    pub data: Vec<R>,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub(crate) error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl<R: DeserializeOwned> Page<R> {
    /// Decode a response body. An error envelope fails the page even on 200.
    pub fn parse(body: &str) -> Result<Self, GraphError> {
        let page: Self = serde_json::from_str(body).map_err(|e| GraphError::decode(e, body))?;
        if let Some(error) = &page.error {
            return Err(GraphError::Api {
                message: error.describe(),
            });
        }
        Ok(page)
    }
}

impl Paging {
    /// The link to follow, if any.
    ///
    /// The `after` cursor decides: some responses echo a `next` link on the
    /// final page, so a missing or empty cursor ends pagination regardless.
    pub fn next_link(self) -> Option<String> {
        self.cursors
            .and_then(|c| c.after)
            .filter(|after| !after.is_empty())?;
        self.next.filter(|next| !next.is_empty())
    }
}

/// Strip the API root from an upstream `next` link so the same GET
/// primitive can issue it. Links on another root are returned unchanged.
pub fn strip_base<'a>(link: &'a str, base_url: &str) -> &'a str {
    link.strip_prefix(base_url.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(link)
}

#[derive(Debug)]
enum PageRequest {
    First {
        path: String,
        params: Vec<(String, String)>,
    },
    Next(String),
}

/// Lazy record sequence over a cursor-paginated edge.
///
/// Pages are requested only when the previous page's records are used up,
/// so at most one page is held at a time. The first error is yielded once
/// and the iterator is fused afterwards.
pub struct Paginator<'a, C: GraphTransport + ?Sized, R> {
    client: &'a C,
    pending: Option<PageRequest>,
    buffer: std::vec::IntoIter<R>,
    yielded: usize,
    max_count: Option<usize>,
    pages: usize,
    done: bool,
}

impl<'a, C: GraphTransport + ?Sized, R: DeserializeOwned> Paginator<'a, C, R> {
    pub fn new(
        client: &'a C,
        path: impl Into<String>,
        params: Vec<(String, String)>,
        max_count: Option<usize>,
    ) -> Self {
        Self {
            client,
            pending: Some(PageRequest::First {
                path: path.into(),
                params,
            }),
            buffer: Vec::new().into_iter(),
            yielded: 0,
            max_count,
            pages: 0,
            done: false,
        }
    }

    /// Records yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn fetch(&mut self, request: PageRequest) -> Result<Page<R>, GraphError> {
        self.pages += 1;
        let body = match &request {
            PageRequest::First { path, params } => {
                let params: Vec<(&str, &str)> = params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                self.client.get(path, &params)?
            }
            PageRequest::Next(link) => {
                let path = strip_base(link, self.client.base_url());
                self.client.get(path, &[])?
            }
        };
        Page::parse(&body)
    }
}

impl<C: GraphTransport + ?Sized, R: DeserializeOwned> Iterator for Paginator<'_, C, R> {
    type Item = Result<R, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.max_count.is_some_and(|max| self.yielded >= max) {
                self.done = true;
                return None;
            }
            if let Some(record) = self.buffer.next() {
                self.yielded += 1;
                return Some(Ok(record));
            }

            let Some(request) = self.pending.take() else {
                self.done = true;
                return None;
            };
            match self.fetch(request) {
                Ok(page) => {
                    log::trace!("page {}: {} records", self.pages, page.data.len());
                    self.pending = page
                        .paging
                        .and_then(Paging::next_link)
                        .map(PageRequest::Next);
                    self.buffer = page.data.into_iter();
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{FAKE_ROOT, FakeTransport, last_page, page_to, posts};

    fn walk(fake: &FakeTransport, max: Option<usize>) -> Vec<Result<Value, GraphError>> {
        Paginator::<_, Value>::new(fake, "g/feed", vec![("limit".into(), "3".into())], max)
            .collect()
    }

    fn ids(results: &[Result<Value, GraphError>]) -> Vec<String> {
        results
            .iter()
            .map(|r| r.as_ref().unwrap()["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn follows_next_while_after_present() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..2), "A1", "g/feed?after=A1"))
            .page("g/feed?after=A1", page_to(posts("p", 2..4), "A2", "g/feed?after=A2"))
            .page("g/feed?after=A2", last_page(posts("p", 4..5)));

        let results = walk(&fake, None);
        assert_eq!(ids(&results), vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(
            fake.paths(),
            vec!["g/feed", "g/feed?after=A1", "g/feed?after=A2"]
        );
    }

    #[test]
    fn stops_without_after_even_if_next_present() {
        let body = json!({
            "data": posts("p", 0..2),
            "paging": { "cursors": {}, "next": format!("{FAKE_ROOT}/g/feed?after=stale") }
        });
        let fake = FakeTransport::new().page("g/feed", body);

        let results = walk(&fake, None);
        assert_eq!(results.len(), 2);
        assert_eq!(fake.paths(), vec!["g/feed"]);
    }

    #[test]
    fn empty_after_is_terminal() {
        let body = json!({
            "data": posts("p", 0..1),
            "paging": { "cursors": { "after": "" }, "next": format!("{FAKE_ROOT}/g/feed?x") }
        });
        let fake = FakeTransport::new().page("g/feed", body);
        assert_eq!(walk(&fake, None).len(), 1);
        assert_eq!(fake.paths().len(), 1);
    }

    #[test]
    fn after_without_next_is_terminal() {
        let body = json!({ "data": posts("p", 0..1), "paging": { "cursors": { "after": "A1" } } });
        let fake = FakeTransport::new().page("g/feed", body);
        assert_eq!(walk(&fake, None).len(), 1);
        assert_eq!(fake.paths().len(), 1);
    }

    #[test]
    fn missing_paging_is_terminal() {
        let fake = FakeTransport::new().page("g/feed", json!({ "data": posts("p", 0..3) }));
        assert_eq!(walk(&fake, None).len(), 3);
    }

    #[test]
    fn max_count_truncates_mid_page_without_extra_requests() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..3), "A1", "g/feed?after=A1"))
            .page("g/feed?after=A1", page_to(posts("p", 3..6), "A2", "g/feed?after=A2"))
            .page("g/feed?after=A2", last_page(posts("p", 6..9)));

        let results = walk(&fake, Some(5));
        assert_eq!(ids(&results), vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(fake.paths(), vec!["g/feed", "g/feed?after=A1"]);
    }

    #[test]
    fn max_count_on_page_boundary_skips_next_page() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..3), "A1", "g/feed?after=A1"));
        assert_eq!(walk(&fake, Some(3)).len(), 3);
        assert_eq!(fake.paths(), vec!["g/feed"]);
    }

    #[test]
    fn max_count_zero_sends_nothing() {
        let fake = FakeTransport::new();
        assert!(walk(&fake, Some(0)).is_empty());
        assert!(fake.paths().is_empty());
    }

    #[test]
    fn short_pages_yield_what_upstream_returns() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..1), "A1", "g/feed?after=A1"))
            .page("g/feed?after=A1", page_to(json!([]), "A2", "g/feed?after=A2"))
            .page("g/feed?after=A2", last_page(posts("p", 1..2)));
        assert_eq!(ids(&walk(&fake, None)), vec!["p0", "p1"]);
    }

    #[test]
    fn first_request_carries_params_next_does_not() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..1), "A1", "g/feed?after=A1"))
            .page("g/feed?after=A1", last_page(json!([])));
        walk(&fake, None);
        assert_eq!(fake.params(0), vec![("limit".to_string(), "3".to_string())]);
        assert!(fake.params(1).is_empty());
    }

    #[test]
    fn http_error_fails_sequence_once() {
        let fake = FakeTransport::new()
            .page("g/feed", page_to(posts("p", 0..2), "A1", "g/feed?after=A1"))
            .status(
                "g/feed?after=A1",
                500,
                r#"{"error":{"message":"An unexpected error has occurred."}}"#,
            );

        let mut pager = Paginator::<_, Value>::new(&fake, "g/feed", vec![], None);
        assert!(pager.next().unwrap().is_ok());
        assert!(pager.next().unwrap().is_ok());
        match pager.next().unwrap() {
            Err(GraphError::Http { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "An unexpected error has occurred.");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(pager.next().is_none());
        assert_eq!(fake.paths().len(), 2);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let fake = FakeTransport::new().raw("g/feed", "<html>maintenance</html>");
        let results = walk(&fake, None);
        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(GraphError::Decode { body, .. }) => assert_eq!(body, "<html>maintenance</html>"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn error_envelope_on_200_fails() {
        let fake = FakeTransport::new().page(
            "g/feed",
            json!({ "error": { "message": "(#10) Permission denied", "code": 10 } }),
        );
        let results = walk(&fake, None);
        assert!(matches!(&results[0], Err(GraphError::Api { message }) if message.contains("Permission")));
    }

    #[test]
    fn strip_base_handles_prefixes() {
        assert_eq!(
            strip_base("https://graph.test/v19.0/1/feed?after=x", "https://graph.test/v19.0"),
            "1/feed?after=x"
        );
        assert_eq!(
            strip_base("https://graph.test/v19.0/1/feed", "https://graph.test/v19.0/"),
            "1/feed"
        );
        assert_eq!(
            strip_base("https://graph.test/v18.0/1/feed", "https://graph.test/v19.0"),
            "https://graph.test/v18.0/1/feed"
        );
        // prefix match must end on a path boundary
        assert_eq!(
            strip_base("https://graph.test/v19.01/feed", "https://graph.test/v19.0"),
            "https://graph.test/v19.01/feed"
        );
    }

    #[test]
    fn next_link_rules() {
        let paging = |after: Option<&str>, next: Option<&str>| Paging {
            cursors: Some(Cursors {
                before: None,
                after: after.map(String::from),
            }),
            next: next.map(String::from),
        };
        assert_eq!(paging(Some("a"), Some("n")).next_link(), Some("n".to_string()));
        assert_eq!(paging(None, Some("n")).next_link(), None);
        assert_eq!(paging(Some(""), Some("n")).next_link(), None);
        assert_eq!(paging(Some("a"), None).next_link(), None);
        assert_eq!(Paging::default().next_link(), None);
    }
}
