//! Core SCGI protocol abstractions.
//!
//! This module provides the data types the codec and client layers are built
//! from: the request and response values, the decoded message stream items,
//! and the error taxonomy.
//!
//! # Architecture
//!
//! - **Message handling** ([`message`]): [`Message`] (head or payload) and
//!   [`PayloadItem`] (chunk or EOF), produced by the response decoder
//! - **Request** ([`request`]): [`ScgiRequest`], the target, environment fields
//!   and body, immutable once handed to the encoder
//! - **Response** ([`response`]): [`Status`] and [`ScgiResponse`], the parsed
//!   status line plus the lazy body
//! - **Body streaming** ([`body`]): [`body::ResponseBody`], the
//!   `http_body::Body` implementation backed by the live connection
//! - **Error handling** ([`error`]): [`ScgiError`], [`ResolveError`] and
//!   [`DecodeError`]
//!
//! One rule shapes all of these types: a connection carries exactly one
//! exchange. There is no keep-alive and no pipelining in SCGI, so a response
//! owns its connection outright and closing one closes the other.

mod message;
pub use message::Message;
pub use message::PayloadItem;

mod request;
pub(crate) use request::MANDATORY_FIELDS;
pub use request::ScgiRequest;

mod response;
pub use response::ScgiResponse;
pub use response::Status;

mod error;
pub use error::DecodeError;
pub use error::ResolveError;
pub use error::ScgiError;

pub mod body;
