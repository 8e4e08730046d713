//! SCGI request type.
//!
//! A request owns everything that ends up on the wire: the target address,
//! the values of the mandatory environment fields, the ordered extension
//! fields, and the body. `CONTENT_LENGTH` is not stored anywhere: it is
//! derived from the body at encode time, so it can never go stale and two
//! concurrent requests never share mutable field state.

use bytes::Bytes;
use http::{Method, Uri};

/// Environment field names the encoder always emits itself, in wire order.
///
/// Extension fields carrying one of these names are dropped at encode time so
/// the mandatory set is never duplicated on the wire.
pub(crate) const MANDATORY_FIELDS: [&str; 4] =
    ["CONTENT_LENGTH", "SCGI", "REQUEST_METHOD", "SERVER_PROTOCOL"];

/// An SCGI request: target address, environment fields and body.
///
/// Defaults follow the protocol conventions: `REQUEST_METHOD=POST` and
/// `SERVER_PROTOCOL=HTTP/1.1`. Extension fields are emitted after the
/// mandatory set, in the order they were supplied.
///
/// # Example
///
/// ```
/// use micro_scgi::protocol::ScgiRequest;
///
/// let request = ScgiRequest::new("127.0.0.1:4000".parse().unwrap(), "hello")
///     .with_field("REQUEST_URI", "/rpc");
/// assert_eq!(request.body().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ScgiRequest {
    target: Uri,
    method: Method,
    protocol: String,
    fields: Vec<(String, String)>,
    body: Bytes,
}

impl ScgiRequest {
    /// Creates a request for `target` carrying `body`, with default
    /// method and protocol fields.
    pub fn new(target: Uri, body: impl Into<Bytes>) -> Self {
        Self {
            target,
            method: Method::POST,
            protocol: String::from("HTTP/1.1"),
            fields: Vec::new(),
            body: body.into(),
        }
    }

    /// Overrides the `REQUEST_METHOD` field.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Overrides the `SERVER_PROTOCOL` field.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Appends an extension environment field.
    ///
    /// Fields are kept in insertion order. A field named like one of the
    /// mandatory fields is not rejected here but will be skipped by the
    /// encoder.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn target(&self) -> &Uri {
        &self.target
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
