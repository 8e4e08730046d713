//! Transport selection and dialing.
//!
//! A target address is an [`Uri`] in one of three shapes:
//!
//! - authority form, `host:port`: TCP
//! - a full URL with a host component: TCP to that host and port
//! - a bare filesystem path: a unix domain socket at that path
//!
//! Resolution is deterministic and does no network I/O: the only side
//! effect is a single filesystem stat in the host-less branch, to check the
//! path actually names a socket special file. There is no fallback between
//! transports: a host-less target whose path is missing or not a socket
//! fails with a [`ResolveError`] rather than being tried over TCP.
//!
//! SCGI has no default port, so a TCP target must spell one out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use http::Uri;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tracing::trace;

use crate::ensure;
use crate::protocol::ResolveError;

/// A resolved transport: where and how to dial.
///
/// Resolution and dialing are separate steps: holding a `Transport` costs
/// nothing and opens nothing until [`connect`](Transport::connect) is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// TCP to a `host:port` authority
    Tcp(String),
    /// Unix domain socket at a filesystem path
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Transport {
    /// Resolves a target address to a transport.
    ///
    /// A target with a host component selects TCP; one without selects a
    /// unix socket at the target's path, which must exist and be a socket
    /// special file.
    pub fn resolve(target: &Uri) -> Result<Self, ResolveError> {
        match target.host() {
            Some(host) => {
                let port = target
                    .port_u16()
                    .ok_or_else(|| ResolveError::invalid_address(format!("tcp target {host:?} has no port")))?;
                Ok(Transport::Tcp(format!("{host}:{port}")))
            }
            None => resolve_socket_path(target.path()),
        }
    }

    /// Opens a connection to the resolved peer.
    pub async fn connect(&self) -> io::Result<ScgiStream> {
        match self {
            Transport::Tcp(authority) => {
                trace!(authority = %authority, "dialing tcp");
                Ok(ScgiStream::Tcp(TcpStream::connect(authority).await?))
            }
            #[cfg(unix)]
            Transport::Unix(path) => {
                trace!(path = %path.display(), "dialing unix socket");
                Ok(ScgiStream::Unix(UnixStream::connect(path).await?))
            }
        }
    }
}

#[cfg(unix)]
fn resolve_socket_path(path: &str) -> Result<Transport, ResolveError> {
    use std::os::unix::fs::FileTypeExt;

    ensure!(!path.is_empty(), ResolveError::invalid_address("target has neither host nor path"));

    let path = Path::new(path);
    let metadata = fs::metadata(path)
        .map_err(|source| ResolveError::Stat { path: path.to_owned(), source })?;
    ensure!(
        metadata.file_type().is_socket(),
        ResolveError::NotASocket { path: path.to_owned() }
    );

    Ok(Transport::Unix(path.to_owned()))
}

#[cfg(not(unix))]
fn resolve_socket_path(_path: &str) -> Result<Transport, ResolveError> {
    Err(ResolveError::invalid_address("unix socket targets are not supported on this platform"))
}

/// A connected byte stream over either transport.
///
/// Delegates [`AsyncRead`]/[`AsyncWrite`] to the underlying socket so the
/// codec layer never needs to know which transport was selected.
#[derive(Debug)]
pub enum ScgiStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl AsyncRead for ScgiStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ScgiStream::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            #[cfg(unix)]
            ScgiStream::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ScgiStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            ScgiStream::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            #[cfg(unix)]
            ScgiStream::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ScgiStream::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            #[cfg(unix)]
            ScgiStream::Unix(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            ScgiStream::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            #[cfg(unix)]
            ScgiStream::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
