//! Restatic - a small HTTP server for static files and registered handlers
//!
//! Requests under a namespace prefix (default `/App`) go to handlers
//! registered on an [`App`]; everything else is looked up below a static
//! root directory.

pub mod app;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod router;
pub mod server;
pub mod static_files;

pub use app::{App, AppBuilder};
pub use config::{Config, Limits};
pub use error::ServerError;
