//! Netstring framing.
//!
//! A netstring is a self-delimiting byte-string encoding: the ASCII decimal
//! length of the payload, a colon, the payload verbatim, and a trailing
//! comma. SCGI uses exactly one netstring per request, wrapping the header
//! block; the request body follows the frame unencoded.
//!
//! Framing cannot fail (the length is always representable), so [`frame`] is
//! a plain function rather than an encoder type. [`decode`] is the inverse,
//! with the incremental `Ok(None)`-on-partial-input contract the codec
//! decoders in this crate share.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::ensure;
use crate::protocol::DecodeError;

/// Appends the netstring frame of `payload` to `dst`.
///
/// The empty payload frames to `0:,`.
pub fn frame(payload: &[u8], dst: &mut BytesMut) {
    let length = payload.len().to_string();
    dst.reserve(length.len() + payload.len() + 2);
    dst.put_slice(length.as_bytes());
    dst.put_u8(b':');
    dst.put_slice(payload);
    dst.put_u8(b',');
}

/// Decodes one netstring frame from the front of `src`.
///
/// Returns `Ok(None)` if `src` does not yet hold a complete frame. On
/// success the frame is consumed from `src`, trailing comma included, and
/// the payload is returned.
pub fn decode(src: &mut BytesMut) -> Result<Option<Bytes>, DecodeError> {
    let Some(colon) = src.iter().position(|b| *b == b':') else {
        // a frame this long with no colon yet cannot be a valid length prefix
        ensure!(src.iter().all(u8::is_ascii_digit), DecodeError::invalid_frame("length prefix is not decimal"));
        ensure!(src.len() <= 20, DecodeError::invalid_frame("length prefix too long"));
        return Ok(None);
    };

    let length: usize = std::str::from_utf8(&src[..colon])
        .ok()
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| DecodeError::invalid_frame("length prefix is not decimal"))?;

    // length digits + colon + payload + comma
    let total = colon + 1 + length + 1;
    if src.len() < total {
        return Ok(None);
    }

    let mut taken = src.split_to(total);
    taken.advance(colon + 1);
    let payload = taken.split_to(length).freeze();
    ensure!(taken[0] == b',', DecodeError::invalid_frame("missing trailing comma"));
    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_payload() {
        let mut dst = BytesMut::new();
        frame(b"hello", &mut dst);
        assert_eq!(&dst[..], b"5:hello,");
    }

    #[test]
    fn frames_empty_payload() {
        let mut dst = BytesMut::new();
        frame(b"", &mut dst);
        assert_eq!(&dst[..], b"0:,");
    }

    #[test]
    fn round_trip_consumes_whole_frame() {
        let payloads: [&[u8]; 4] = [b"", b"x", b"hello world", &[0, 1, 2, 255]];
        for payload in payloads {
            let mut buffer = BytesMut::new();
            frame(payload, &mut buffer);
            let framed_len = buffer.len();
            assert_eq!(framed_len, payload.len().to_string().len() + payload.len() + 2);

            let decoded = decode(&mut buffer).unwrap().unwrap();
            assert_eq!(&decoded[..], payload);
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn partial_frame_needs_more_data() {
        let mut buffer = BytesMut::from(&b"11:hello"[..]);
        assert!(decode(&mut buffer).unwrap().is_none());
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn partial_length_prefix_needs_more_data() {
        let mut buffer = BytesMut::from(&b"123"[..]);
        assert!(decode(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn rejects_non_decimal_length() {
        let mut buffer = BytesMut::from(&b"5x:hello,"[..]);
        assert!(matches!(decode(&mut buffer), Err(DecodeError::InvalidFrame { .. })));
    }

    #[test]
    fn rejects_missing_comma() {
        let mut buffer = BytesMut::from(&b"5:hello;"[..]);
        assert!(matches!(decode(&mut buffer), Err(DecodeError::InvalidFrame { .. })));
    }

    #[test]
    fn leaves_trailing_bytes_in_place() {
        let mut buffer = BytesMut::from(&b"3:abc,def"[..]);
        let decoded = decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&decoded[..], b"abc");
        assert_eq!(&buffer[..], b"def");
    }
}
