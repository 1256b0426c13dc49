//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, bodies
//! sized by `Content-Length`, and responses carrying only `Content-Type` and
//! `Content-Length`.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one client connection through its state machine
//! - **`parser`**: Parses incoming HTTP requests and query strings from byte buffers
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a complete request (read deadline)
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │    Routing       │ ← Handler or static file
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response (write deadline)
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! A malformed request, an early disconnect or an expired deadline moves
//! straight to `Closed` without a response.

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
