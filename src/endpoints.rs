//! Built-in demo endpoints.
//!
//! `GET /hello` and `GET /pi` are plain text. The `/rests/hello` pair keeps a
//! set of registered user names: POST registers a name from a form body and
//! GET reports whether a name is known, both answering in JSON.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::json;
use tracing::debug;

use crate::app::AppBuilder;
use crate::http::request::Request;
use crate::http::response::Response;

const JSON: &str = "application/json";
const UNKNOWN_USER: &str = "Unknown";

/// Names registered through `POST /rests/hello`.
///
/// Shared by every connection; writes take the lock exclusively so
/// concurrent registrations are never lost.
#[derive(Debug, Default)]
pub struct UserRegistry {
    names: RwLock<HashSet<String>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`; returns `false` if it was already there.
    pub fn register(&self, name: &str) -> bool {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Hello <name>`, with `name` from the query string (default `World`).
pub fn hello(req: &Request, _resp: &mut Response) -> String {
    format!("Hello {}", req.query_or("name", "World"))
}

/// The decimal expansion of π.
pub fn pi(_req: &Request, _resp: &mut Response) -> String {
    std::f64::consts::PI.to_string()
}

/// Reports whether the `name` query parameter is a registered user.
pub fn greet_user(registry: &UserRegistry, req: &Request, resp: &mut Response) -> String {
    let name = non_empty(req.query("name"));

    let message = if registry.contains(name) {
        format!("Hello, {name}. Welcome back!")
    } else {
        format!("User {name} is not registered.")
    };

    json_message(resp, message)
}

/// Registers the `name` field of a form-encoded body.
pub fn register_user(registry: &UserRegistry, req: &Request, resp: &mut Response) -> String {
    let form = req.form();
    let name = non_empty(form.get("name").map(String::as_str));

    let added = registry.register(name);
    debug!(name, added, total = registry.len(), "User registration");

    json_message(resp, format!("User {name} registered successfully."))
}

fn non_empty(name: Option<&str>) -> &str {
    name.filter(|n| !n.is_empty()).unwrap_or(UNKNOWN_USER)
}

fn json_message(resp: &mut Response, message: String) -> String {
    resp.set_content_type(JSON);
    json!({ "message": message }).to_string()
}

/// Adds all demo routes to `builder`.
pub fn register(builder: AppBuilder, registry: Arc<UserRegistry>) -> AppBuilder {
    let readers = Arc::clone(&registry);
    let writers = registry;

    builder
        .get("/hello", hello)
        .get("/pi", pi)
        .get("/rests/hello", move |req, resp| greet_user(&readers, req, resp))
        .post("/rests/hello", move |req, resp| register_user(&writers, req, resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::{Method, RequestBuilder};

    #[test]
    fn registry_ignores_duplicates() {
        let registry = UserRegistry::new();

        assert!(registry.register("ana"));
        assert!(!registry.register("ana"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_then_greet() {
        let registry = UserRegistry::new();
        let post = RequestBuilder::new()
            .method(Method::POST)
            .path("/App/rests/hello")
            .body("name=Ana")
            .build()
            .unwrap();
        let get = RequestBuilder::new()
            .method(Method::GET)
            .path("/App/rests/hello?name=Ana")
            .build()
            .unwrap();

        let mut resp = Response::default();
        let body = register_user(&registry, &post, &mut resp);
        assert_eq!(resp.content_type, "application/json");
        assert!(body.contains("User Ana registered"));

        let body = greet_user(&registry, &get, &mut Response::default());
        assert!(body.contains("Welcome back"));
    }
}
