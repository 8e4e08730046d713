use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::protocol::ScgiResponse;

/// Top-level error returned by the client session.
///
/// Every variant is annotated with the stage that produced it (resolve, dial,
/// write, decode). No variant is ever retried by this crate: SCGI carries no
/// idempotency guarantee, so retry policy belongs to the caller.
///
/// `RejectedStatus` is special: the exchange itself succeeded on the wire, the
/// server just did not answer `Status: 200`. The variant carries the full live
/// response so the caller can inspect the status line and drain the body; the
/// connection stays open inside it until the response is closed or dropped.
#[derive(Debug, Error)]
pub enum ScgiError {
    #[error("address resolution error: {source}")]
    Resolve {
        #[from]
        source: ResolveError,
    },

    #[error("dial error: {source}")]
    Dial {
        #[source]
        source: io::Error,
    },

    #[error("write request error: {source}")]
    Write {
        #[source]
        source: io::Error,
    },

    #[error("read response error: {source}")]
    Decode {
        #[from]
        source: DecodeError,
    },

    #[error("invalid request body: {reason}")]
    InvalidBody { reason: String },

    #[error("server rejected request: {}", .response.status())]
    RejectedStatus { response: Box<ScgiResponse> },
}

impl ScgiError {
    pub fn dial(source: io::Error) -> Self {
        Self::Dial { source }
    }

    pub fn write(source: io::Error) -> Self {
        Self::Write { source }
    }

    pub fn invalid_body<S: ToString>(reason: S) -> Self {
        Self::InvalidBody { reason: reason.to_string() }
    }

    pub fn rejected(response: ScgiResponse) -> Self {
        Self::RejectedStatus { response: Box::new(response) }
    }

    /// Recovers the live response from a `RejectedStatus` error.
    ///
    /// Returns None for every other variant, which never carry a response.
    pub fn into_response(self) -> Option<ScgiResponse> {
        match self {
            Self::RejectedStatus { response } => Some(*response),
            _ => None,
        }
    }
}

/// Errors produced while resolving a target address to a transport.
///
/// Resolution never falls back between transports: a host-less target whose
/// path is not an existing unix socket fails here rather than being retried
/// over TCP.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid target address: {reason}")]
    InvalidAddress { reason: String },

    #[error("cannot stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not a unix socket")]
    NotASocket { path: PathBuf },
}

impl ResolveError {
    pub fn invalid_address<S: ToString>(reason: S) -> Self {
        Self::InvalidAddress { reason: reason.to_string() }
    }
}

/// Errors produced while decoding the server's response.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("connection closed before a complete status line was read")]
    TruncatedResponse,

    #[error("malformed status line: {line:?}")]
    MalformedStatus { line: String },

    #[error("invalid netstring frame: {reason}")]
    InvalidFrame { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl DecodeError {
    pub fn malformed_status<S: ToString>(line: S) -> Self {
        Self::MalformedStatus { line: line.to_string() }
    }

    pub fn invalid_frame<S: ToString>(reason: S) -> Self {
        Self::InvalidFrame { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
