//! The client session: one connection, one exchange.
//!
//! [`send_request`] is the orchestration the rest of the crate exists for:
//! resolve the target to a transport, dial it, write the encoded request,
//! decode the status line, and hand the still-open connection to the caller
//! inside the returned [`ScgiResponse`].
//!
//! Connections are never pooled or reused: SCGI is one request per
//! connection, full stop. On any failure before a response head is decoded,
//! the connection (if one was opened) is dropped, and with it closed, before
//! the error propagates. The one exception is a well-formed non-200 status:
//! the error carries the live response so the caller can still read what the
//! server said.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::Uri;
use tokio::io;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, trace};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::protocol::body::ResponseBody;
use crate::protocol::{DecodeError, Message, ResolveError, ScgiError, ScgiRequest, ScgiResponse};
use crate::transport::Transport;

/// Sends `body` to the SCGI server at `target` with default request fields.
///
/// `target` may be a `host:port` authority, a URL with a host, or a path to
/// a unix socket. Equivalent to building an [`ScgiRequest`] with defaults
/// and calling [`send_request`].
pub async fn send(target: &str, body: impl Into<Bytes>) -> Result<ScgiResponse, ScgiError> {
    let target: Uri = target
        .parse()
        .map_err(|e: http::uri::InvalidUri| ResolveError::invalid_address(e))?;
    send_request(ScgiRequest::new(target, body)).await
}

/// Sends a pre-built request and decodes the server's response head.
///
/// On success the returned response owns the connection; the caller reads
/// the body at its own pace and closes (or drops) the response when done.
pub async fn send_request(request: ScgiRequest) -> Result<ScgiResponse, ScgiError> {
    let transport = Transport::resolve(request.target())?;
    let stream = transport.connect().await.map_err(ScgiError::dial)?;
    let (reader, writer) = io::split(stream);

    let mut framed_write = FramedWrite::new(writer, RequestEncoder::new());
    framed_write.send(request).await.map_err(ScgiError::write)?;
    let writer = framed_write.into_inner();

    let mut framed_read = FramedRead::new(reader, ResponseDecoder::new());
    let status = match framed_read.next().await {
        Some(Ok(Message::Header(status))) => status,
        Some(Ok(Message::Payload(_))) => {
            error!("decoder produced payload before a status head");
            return Err(DecodeError::io(io::Error::from(io::ErrorKind::InvalidData)).into());
        }
        Some(Err(e)) => return Err(e.into()),
        None => return Err(DecodeError::TruncatedResponse.into()),
    };
    trace!(status = %status, "received response head");

    let response = ScgiResponse::new(status, ResponseBody::new(framed_read, writer));
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ScgiError::rejected(response))
    }
}
