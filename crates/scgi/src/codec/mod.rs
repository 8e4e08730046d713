//! SCGI codec module for encoding requests and decoding responses
//!
//! This module provides the wire-level half of the crate: building the exact
//! byte sequence an SCGI server expects, and turning the server's reply back
//! into a status head plus a streamed body.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`netstring`]: the length-prefixed framing SCGI wraps its header block in
//!   - [`HeaderEncoder`]: the ordered `name\0value\0` environment block
//!   - [`RequestEncoder`]: the full wire payload (framed block + raw body)
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: status-line validation and lazy body streaming,
//!     via a state machine
//!
//! # Example
//!
//! ```
//! use micro_scgi::codec::RequestEncoder;
//! use micro_scgi::protocol::ScgiRequest;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//!
//! let request = ScgiRequest::new("127.0.0.1:4000".parse().unwrap(), "hello");
//!
//! let mut wire = BytesMut::new();
//! RequestEncoder::new().encode(request, &mut wire).unwrap();
//! assert!(wire.starts_with(b"69:CONTENT_LENGTH\x00"));
//! assert!(wire.ends_with(b",hello"));
//! ```

pub mod netstring;

mod header_encoder;
mod request_encoder;
mod response_decoder;

pub use header_encoder::HeaderEncoder;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
