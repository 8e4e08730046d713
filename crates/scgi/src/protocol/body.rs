//! Lazy response body streaming.
//!
//! # Design
//!
//! The response body and the connection are one resource: the body is the
//! unread remainder of the socket, so neither can outlive the other. Instead
//! of handing both halves to the caller separately, [`ResponseBody`] owns the
//! framed read half and the write half together and exposes a single
//! [`close`](ResponseBody::close) operation. Dropping the body closes the
//! connection as well.
//!
//! Reading is deferred entirely to the caller: nothing is drained eagerly,
//! and chunks surface in whatever sizes the decoder produces them,
//! independent of how the caller consumes them. The body also implements
//! [`http_body::Body`] so it plugs into generic HTTP client stacks unchanged.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http_body::{Body, Frame};
use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};
use tokio_util::codec::FramedRead;
use tracing::error;

use crate::codec::ResponseDecoder;
use crate::protocol::{DecodeError, Message, PayloadItem};
use crate::transport::ScgiStream;

/// The body of an SCGI response, backed by the still-open connection.
pub struct ResponseBody {
    framed: FramedRead<ReadHalf<ScgiStream>, ResponseDecoder>,
    writer: WriteHalf<ScgiStream>,
    complete: bool,
}

impl ResponseBody {
    pub(crate) fn new(
        framed: FramedRead<ReadHalf<ScgiStream>, ResponseDecoder>,
        writer: WriteHalf<ScgiStream>,
    ) -> Self {
        Self { framed, writer, complete: false }
    }

    /// Whether the server's end of stream has already been observed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Reads the remaining body to completion and returns it as one buffer.
    ///
    /// Chunk sizes on the wire do not matter: the result is exactly the bytes
    /// the server wrote after its status line, in order.
    pub async fn read_to_end(&mut self) -> Result<Bytes, DecodeError> {
        let mut buffer = BytesMut::new();
        while !self.complete {
            match self.framed.next().await {
                Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                    buffer.extend_from_slice(&bytes);
                }
                Some(Ok(Message::Payload(PayloadItem::Eof))) | None => {
                    self.complete = true;
                }
                Some(Ok(Message::Header(_))) => {
                    error!("received second status head in body phase");
                    self.complete = true;
                    return Err(DecodeError::io(io::Error::from(io::ErrorKind::InvalidData)));
                }
                Some(Err(e)) => {
                    self.complete = true;
                    return Err(e);
                }
            }
        }
        Ok(buffer.freeze())
    }

    /// Closes the connection, shutting the write direction down first.
    pub async fn close(mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}

/// Implements the standard body interface over the live connection.
///
/// This is the seam generic HTTP stacks consume: frames are polled straight
/// off the framed read half, one decoder item per frame.
impl Body for ResponseBody {
    type Data = Bytes;
    type Error = DecodeError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.complete {
            return Poll::Ready(None);
        }

        match ready!(this.framed.poll_next_unpin(cx)) {
            Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                Poll::Ready(Some(Ok(Frame::data(bytes))))
            }
            Some(Ok(Message::Payload(PayloadItem::Eof))) | None => {
                this.complete = true;
                Poll::Ready(None)
            }
            Some(Ok(Message::Header(_))) => {
                error!("received second status head in body phase");
                this.complete = true;
                Poll::Ready(Some(Err(DecodeError::io(io::Error::from(io::ErrorKind::InvalidData)))))
            }
            Some(Err(e)) => {
                this.complete = true;
                Poll::Ready(Some(Err(e)))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.complete
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").field("complete", &self.complete).finish_non_exhaustive()
    }
}
