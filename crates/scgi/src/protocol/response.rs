//! SCGI response head handling.
//!
//! An SCGI response opens with a single CGI-style status line,
//! `Status: <code> <reason>`, and everything after that line is body. The
//! [`Status`] type keeps both the parsed form (numeric code, reason phrase)
//! and the raw line so callers always have the server's exact words for
//! diagnostics.

use std::fmt;
use std::io;

use crate::protocol::body::ResponseBody;

/// A parsed SCGI status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: u16,
    reason: String,
    line: String,
}

impl Status {
    pub(crate) fn new(code: u16, reason: &str, line: &str) -> Self {
        Self { code, reason: reason.to_string(), line: line.to_string() }
    }

    /// The numeric status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The reason phrase, possibly empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The raw status line as the server sent it, trailing CR/LF stripped.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Whether this is the canonical success status (code 200).
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.reason)
        }
    }
}

/// A decoded SCGI response: the status head plus a lazy body stream.
///
/// The response owns the underlying connection. The body is forward-only and
/// non-restartable: it is read straight off the socket as the caller consumes
/// it. Dropping the response closes the connection; [`ScgiResponse::close`]
/// does the same but also shuts the write direction down cleanly first.
#[derive(Debug)]
pub struct ScgiResponse {
    status: Status,
    body: ResponseBody,
}

impl ScgiResponse {
    pub(crate) fn new(status: Status, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    /// Splits the response into its status and body.
    ///
    /// The body keeps ownership of the connection.
    pub fn into_parts(self) -> (Status, ResponseBody) {
        (self.status, self.body)
    }

    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Closes the response and the connection backing it.
    pub async fn close(self) -> io::Result<()> {
        self.body.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        let status = Status::new(404, "Not Found", "Status: 404 Not Found");
        assert_eq!(status.to_string(), "404 Not Found");
        assert_eq!(status.line(), "Status: 404 Not Found");
        assert!(!status.is_success());
    }

    #[test]
    fn status_display_without_reason() {
        let status = Status::new(200, "", "Status: 200");
        assert_eq!(status.to_string(), "200");
        assert!(status.is_success());
    }
}
