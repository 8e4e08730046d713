//! An asynchronous micro SCGI client implementation
//!
//! This crate provides a lightweight, efficient client for the Simple Common
//! Gateway Interface protocol, built on top of tokio. It encodes an
//! HTTP-style request into the SCGI netstring framing, sends it over a TCP
//! or unix-domain-socket connection, and decodes the server's reply into a
//! status head plus a lazily streamed body.
//!
//! # Features
//!
//! - Byte-exact SCGI request framing (netstring-wrapped header block)
//! - Ordered environment fields with `CONTENT_LENGTH` always first
//! - Transport selection between TCP and unix domain sockets from the target
//!   address
//! - Streaming response bodies through `http_body::Body`
//! - Adapter for generic `http::Request`/`http::Response` stacks
//! - Clean error handling with the server's raw status line preserved
//!
//! # Example
//!
//! ```no_run
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let mut response = match micro_scgi::client::send("127.0.0.1:4000", "hello").await {
//!         Ok(response) => response,
//!         Err(e) => {
//!             error!(cause = %e, "scgi exchange failed");
//!             return;
//!         }
//!     };
//!
//!     info!(status = %response.status(), "server answered");
//!
//!     let body = response.body_mut().read_to_end().await.unwrap();
//!     info!(body = %String::from_utf8_lossy(&body), "received body");
//!
//!     response.close().await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`client`]: The session orchestration external callers use
//! - [`protocol`]: Protocol types and abstractions
//! - [`codec`]: Wire encoding/decoding implementation
//! - [`transport`]: Target resolution and dialing
//! - [`roundtrip`]: Adapter onto the generic `http` types
//!
//! # Protocol model
//!
//! SCGI is strictly one request per connection: no keep-alive, no
//! pipelining, no reuse. A request is a single netstring frame holding the
//! null-delimited environment block, followed by the raw body; the response
//! is a `Status: <code> <reason>` line followed by body bytes until the
//! server closes the connection. The returned [`protocol::ScgiResponse`]
//! owns the connection, and reading its body pulls straight off the socket;
//! dropping or closing the response closes the connection.
//!
//! Each call builds its environment block from scratch. There are no shared
//! default fields, so independent requests can run concurrently on
//! independent connections with no coordination.
//!
//! # Limitations
//!
//! - Everything after the response's first line is treated as opaque body
//!   bytes. Classic CGI header lines (`Content-Type: ...`) and the blank-line
//!   separator are not parsed; they arrive as part of the body.
//! - No timeouts, retries, pooling or cancellation: the protocol defines
//!   none, and imposing deadlines belongs to the embedding layer.
//! - HTTP request headers are not mapped to SCGI environment fields by the
//!   [`roundtrip`] adapter; use [`protocol::ScgiRequest::with_field`] for
//!   extra fields.

pub mod client;
pub mod codec;
pub mod protocol;
pub mod roundtrip;
pub mod transport;

mod utils;
pub(crate) use utils::ensure;
