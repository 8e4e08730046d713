//! SCGI request encoder.
//!
//! Produces the exact byte sequence the wire expects:
//! `<len>:<header-block>,<body>`, the netstring-framed header block
//! followed by the raw body. Only the header block is framed; the body's
//! extent is communicated by `CONTENT_LENGTH` inside the block.
//!
//! Partial writes are not handled here: the encoder fills a buffer, and the
//! framed transport write loops until every byte is on the wire or the
//! connection errors.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::Encoder;

use crate::codec::HeaderEncoder;
use crate::codec::netstring;
use crate::protocol::ScgiRequest;

/// Initial buffer size reserved for the header block
const INIT_HEADER_SIZE: usize = 256;

/// Encoder for SCGI requests implementing the [`Encoder`] trait.
///
/// One encoder instance serves one connection, matching the protocol's
/// one-request-per-connection rule; encoding is stateless, so nothing stops
/// reuse, but the client never does.
#[derive(Debug, Clone, Copy)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<ScgiRequest> for RequestEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: ScgiRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut block = BytesMut::with_capacity(INIT_HEADER_SIZE);
        self.header_encoder.encode(&item, &mut block);

        netstring::frame(&block, dst);
        dst.extend_from_slice(item.body());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_full_wire_message() {
        let request = ScgiRequest::new("127.0.0.1:4000".parse().unwrap(), "hello");

        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(request, &mut dst).unwrap();

        let block = b"CONTENT_LENGTH\x005\x00SCGI\x001\x00REQUEST_METHOD\x00POST\x00SERVER_PROTOCOL\x00HTTP/1.1\x00";
        let mut expected = format!("{}:", block.len()).into_bytes();
        expected.extend_from_slice(block);
        expected.extend_from_slice(b",hello");

        assert_eq!(&dst[..], &expected[..]);
    }

    #[test]
    fn frame_length_covers_header_block_only() {
        let request = ScgiRequest::new("127.0.0.1:4000".parse().unwrap(), "hello");
        let body_len = request.body().len();

        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(request, &mut dst).unwrap();

        let decoded = netstring::decode(&mut dst).unwrap().unwrap();
        assert!(decoded.starts_with(b"CONTENT_LENGTH\x00"));
        // after the frame, only the unframed body remains
        assert_eq!(dst.len(), body_len);
        assert_eq!(&dst[..], b"hello");
    }

    #[test]
    fn empty_body_still_frames_headers() {
        let request = ScgiRequest::new("127.0.0.1:4000".parse().unwrap(), "");

        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(request, &mut dst).unwrap();

        assert!(dst.starts_with(b"69:CONTENT_LENGTH\x000\x00"));
        assert!(dst.ends_with(b"HTTP/1.1\x00,"));
    }
}
