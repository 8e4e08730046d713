//! SCGI header block encoder.
//!
//! This module serializes a request's environment fields into the SCGI
//! header block: a flat concatenation of `name\0value\0` pairs. The block is
//! what gets netstring-framed at the transport layer; no terminator of its
//! own is needed.
//!
//! # Field order
//!
//! Order is part of the wire contract, not cosmetic. `CONTENT_LENGTH` must
//! come first (SCGI servers commonly reject, or crash on, requests where it
//! is absent or late), followed by `SCGI=1`, `REQUEST_METHOD`,
//! `SERVER_PROTOCOL`, then the caller's extension fields in the order they
//! were supplied. `CONTENT_LENGTH` is computed from the body on every call;
//! nothing here is cached or shared between requests.

use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::protocol::{MANDATORY_FIELDS, ScgiRequest};

/// Encoder for the SCGI header block.
///
/// Serializes the mandatory field set followed by the request's extension
/// fields into a `BytesMut`. Extension fields that would duplicate a
/// mandatory field name are skipped, keeping the mandatory set unique.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl HeaderEncoder {
    /// Encodes the header block for `request` into `dst`.
    pub fn encode(&self, request: &ScgiRequest, dst: &mut BytesMut) {
        let content_length = request.body().len().to_string();

        put_field("CONTENT_LENGTH", &content_length, dst);
        put_field("SCGI", "1", dst);
        put_field("REQUEST_METHOD", request.method().as_str(), dst);
        put_field("SERVER_PROTOCOL", request.protocol(), dst);

        for (name, value) in request.fields() {
            if MANDATORY_FIELDS.contains(&name.as_str()) {
                warn!(field = %name, "skipping extension field that duplicates a mandatory field");
                continue;
            }
            put_field(name, value, dst);
        }
    }
}

/// Appends one `name\0value\0` pair to `dst`.
fn put_field(name: &str, value: &str, dst: &mut BytesMut) {
    dst.reserve(name.len() + value.len() + 2);
    dst.put_slice(name.as_bytes());
    dst.put_u8(0);
    dst.put_slice(value.as_bytes());
    dst.put_u8(0);
}
