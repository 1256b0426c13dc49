//! Route table and prefix-based dispatch between handlers and static files.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// A registered route handler.
///
/// Receives the parsed request and a response whose status and content type
/// it may change; the returned string becomes the response body.
pub type Handler = Arc<dyn Fn(&Request, &mut Response) -> String + Send + Sync>;

const INDEX_PATH: &str = "/index.html";

/// Outcome of looking up a request path.
pub enum RouteMatch<'a> {
    /// A registered handler answers the request
    Handler(&'a Handler),
    /// Serve this path relative to the static root
    Static(&'a str),
    /// Nothing answers; respond 404 without touching the filesystem
    NotFound,
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMatch::Handler(_) => f.write_str("Handler"),
            RouteMatch::Static(path) => f.debug_tuple("Static").field(path).finish(),
            RouteMatch::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Maps `(method, path)` to handlers living under a namespace prefix.
///
/// Routes are registered without the prefix (`/hello`) and answer requests
/// that carry it (`/App/hello`). Requests outside the prefix are static file
/// requests. An empty prefix puts routes at the root; unmatched GETs then
/// fall through to static files.
pub struct Router {
    prefix: String,
    routes: HashMap<Method, HashMap<String, Handler>>,
}

impl Router {
    /// Creates an empty router. The prefix is normalized to start with `/`
    /// and to carry no trailing `/`.
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };

        Self {
            prefix,
            routes: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registers a handler, replacing any previous one for the same method
    /// and path.
    pub fn add(&mut self, method: Method, path: &str, handler: Handler) {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        self.routes.entry(method).or_default().insert(path, handler);
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes the namespace prefix, if `path` is under it.
    ///
    /// The prefix only matches whole segments: `/App` and `/App/x` are under
    /// `/App`, `/Apple` is not. An empty prefix never matches.
    pub fn strip_prefix<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.prefix.is_empty() {
            return None;
        }

        let rest = path.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    fn lookup(&self, method: Method, path: &str) -> Option<&Handler> {
        self.routes.get(&method)?.get(path)
    }

    /// Decides who answers `method path`.
    ///
    /// Under the prefix an exact registered path wins; `""`, `/` and
    /// `/index.html` then fall back to the static index for GET; anything
    /// else is 404. Outside the prefix a GET is a static file request and
    /// every other method is 404.
    pub fn route<'a>(&'a self, method: Method, path: &'a str) -> RouteMatch<'a> {
        if let Some(sub) = self.strip_prefix(path) {
            let key = if sub.is_empty() { "/" } else { sub };

            if let Some(handler) = self.lookup(method, key) {
                return RouteMatch::Handler(handler);
            }

            if method == Method::GET && matches!(sub, "" | "/" | INDEX_PATH) {
                return RouteMatch::Static(INDEX_PATH);
            }

            return RouteMatch::NotFound;
        }

        if self.prefix.is_empty() {
            if let Some(handler) = self.lookup(method, path) {
                return RouteMatch::Handler(handler);
            }
        }

        match method {
            Method::GET => RouteMatch::Static(path),
            _ => RouteMatch::NotFound,
        }
    }
}
