//! The server context: route table, static root and limits.
//!
//! An [`App`] is assembled once through [`AppBuilder`] and is immutable
//! afterwards; the listener shares it between connections behind an `Arc`.
//! Handlers that need shared mutable state capture it themselves, guarded by
//! a lock.
//!
//! ```
//! use restatic::App;
//!
//! let app = App::builder()
//!     .prefix("/App")
//!     .static_files("www")
//!     .get("/hello", |req, _resp| format!("Hello {}", req.query_or("name", "World")))
//!     .get("/pi", |_req, _resp| std::f64::consts::PI.to_string())
//!     .build();
//!
//! assert_eq!(app.router().len(), 2);
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::error;

use crate::config::{Config, Limits};
use crate::error::ServerError;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::router::{Handler, RouteMatch, Router};
use crate::static_files::StaticFiles;

pub struct App {
    router: Router,
    static_files: StaticFiles,
    limits: Limits,
}

/// Fluent registration of routes and settings.
pub struct AppBuilder {
    prefix: String,
    static_root: PathBuf,
    limits: Limits,
    routes: Vec<(Method, String, Handler)>,
}

impl Default for AppBuilder {
    fn default() -> Self {
        let cfg = Config::default();
        Self {
            prefix: cfg.prefix.clone(),
            static_root: cfg.static_root.clone(),
            limits: cfg.limits(),
            routes: Vec::new(),
        }
    }
}

impl AppBuilder {
    /// Takes prefix, static root and limits from a [`Config`].
    pub fn config(mut self, cfg: &Config) -> Self {
        self.prefix = cfg.prefix.clone();
        self.static_root = cfg.static_root.clone();
        self.limits = cfg.limits();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the directory static files are served from.
    pub fn static_files(mut self, root: impl Into<PathBuf>) -> Self {
        self.static_root = root.into();
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Registers a GET handler at `path` below the prefix.
    pub fn get<F>(self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> String + Send + Sync + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    /// Registers a POST handler at `path` below the prefix.
    pub fn post<F>(self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> String + Send + Sync + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    fn route<F>(mut self, method: Method, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> String + Send + Sync + 'static,
    {
        self.routes.push((method, path.into(), Arc::new(handler)));
        self
    }

    pub fn build(self) -> App {
        let mut router = Router::new(&self.prefix);
        for (method, path, handler) in self.routes {
            router.add(method, &path, handler);
        }

        App {
            router,
            static_files: StaticFiles::new(self.static_root),
            limits: self.limits,
        }
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn static_files(&self) -> &StaticFiles {
        &self.static_files
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Produces the response for one request.
    ///
    /// Never fails: a missing route or file is 404, a panicking handler or
    /// an unreadable file is 500.
    pub async fn handle(&self, req: &Request) -> Response {
        match self.router.route(req.method, &req.path) {
            RouteMatch::Handler(handler) => invoke(handler, req),
            RouteMatch::Static(path) => match self.static_files.resolve(path).await {
                Ok(file) => ResponseBuilder::new(StatusCode::Ok)
                    .content_type(file.content_type)
                    .body(file.body)
                    .build(),
                Err(ServerError::NotFound) => Response::not_found(),
                Err(e) => {
                    error!(path = %req.path, error = %e, "Failed to serve static file");
                    Response::internal_error()
                }
            },
            RouteMatch::NotFound => Response::not_found(),
        }
    }
}

fn invoke(handler: &Handler, req: &Request) -> Response {
    let mut response = Response::default();

    match panic::catch_unwind(AssertUnwindSafe(|| handler(req, &mut response))) {
        Ok(body) => {
            response.set_body(body);
            response
        }
        Err(_) => {
            error!(method = %req.method, path = %req.path, "Handler panicked");
            Response::internal_error()
        }
    }
}
