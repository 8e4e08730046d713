//! SCGI response decoder.
//!
//! This module decodes a server response using a streaming approach: the
//! first line is parsed and validated as a CGI-style status line, and every
//! byte after it is passed through as opaque body payload until the server
//! closes the connection.
//!
//! # State machine
//!
//! The decoder moves through three states:
//!
//! 1. `StatusLine`: accumulate bytes until a line terminator arrives. EOF
//!    here, before a complete line has arrived, is a truncated response.
//! 2. `Body`: pass buffered bytes through as chunks. There is no length to
//!    track; the body ends when the peer closes its end.
//! 3. `Finished`: terminal, reached once EOF has been surfaced.
//!
//! A malformed status line (wrong prefix, non-numeric code) is an error
//! carrying the raw line for diagnostics. Note that a well-formed non-200
//! status is *not* an error at this layer: the decoder reports what the
//! server said and leaves the accept/reject decision to the client session.
//!
//! # Limitation
//!
//! Classic CGI responses may carry further `Name: value` lines and a blank
//! line before the document. This decoder deliberately does not look for
//! them: everything after the first line is body bytes. See the crate-level
//! documentation.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{DecodeError, Message, PayloadItem, Status};

/// A decoder for SCGI responses that handles the status line and body
///
/// The decoder operates in two phases:
/// 1. Status parsing: decodes and validates the leading `Status:` line
/// 2. Body streaming: passes the remaining connection bytes through lazily
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDecoder {
    state: DecodeState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for the complete first line
    StatusLine,
    /// Streaming opaque body bytes
    Body,
    /// EOF already surfaced
    Finished,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self { state: DecodeState::StatusLine }
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<Status>;
    type Error = DecodeError;

    /// Attempts to decode the next response item from the buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: the validated status line
    /// - `Ok(Some(Message::Payload(_)))`: a body chunk
    /// - `Ok(None)`: need more data
    /// - `Err(_)`: the status line was malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.state {
            DecodeState::StatusLine => {
                let Some(line_end) = src.iter().position(|b| *b == b'\n') else {
                    return Ok(None);
                };

                let line = src.split_to(line_end + 1);
                let status = parse_status_line(&line)?;
                trace!(code = status.code(), "decoded status line");

                self.state = DecodeState::Body;
                Ok(Some(Message::Header(status)))
            }

            DecodeState::Body => {
                if src.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Message::Payload(PayloadItem::Chunk(src.split().freeze()))))
            }

            DecodeState::Finished => Ok(None),
        }
    }

    /// Handles the peer closing its end of the connection.
    ///
    /// EOF while still waiting for the status line means the response was
    /// truncated. EOF in the body phase first flushes whatever is buffered,
    /// then surfaces a single [`PayloadItem::Eof`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.state {
            DecodeState::StatusLine => Err(DecodeError::TruncatedResponse),

            DecodeState::Body => {
                if let Some(item) = self.decode(src)? {
                    return Ok(Some(item));
                }
                trace!("response body reached eof");
                self.state = DecodeState::Finished;
                Ok(Some(Message::Payload(PayloadItem::Eof)))
            }

            DecodeState::Finished => Ok(None),
        }
    }
}

/// Parses and validates one raw status line.
///
/// The line must match `Status: <code> <reason>` with trailing CR/LF
/// stripped; the code is whatever sits between the prefix and the first
/// space, and must be numeric. The reason phrase may be empty.
fn parse_status_line(line: &[u8]) -> Result<Status, DecodeError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| DecodeError::malformed_status(String::from_utf8_lossy(line)))?;
    let text = text.trim_end_matches(['\r', '\n']);

    let rest = text.strip_prefix("Status:").ok_or_else(|| DecodeError::malformed_status(text))?;
    let rest = rest.trim_start_matches(' ');

    let (code, reason) = match rest.split_once(' ') {
        Some((code, reason)) => (code, reason),
        None => (rest, ""),
    };

    let code: u16 = code.parse().map_err(|_| DecodeError::malformed_status(text))?;
    Ok(Status::new(code, reason, text))
}
