//! Adaptation of the core client to the generic `http` request/response
//! types.
//!
//! [`ScgiTransport`] is the seam at which this crate plugs into an HTTP
//! client stack: it accepts an [`http::Request`] with any `http_body::Body`,
//! performs one SCGI exchange, and returns an [`http::Response`] whose body
//! streams from the still-open connection.
//!
//! The request body is collected fully into memory before encoding, since
//! `CONTENT_LENGTH` must be known up front and the protocol has no
//! streaming request mode. In keeping with HTTP transport conventions, a well-formed
//! non-200 reply is returned as an ordinary response here rather than as the
//! core client's rejection error; only protocol and I/O failures surface as
//! errors.
//!
//! Request headers are not translated into SCGI environment fields. Callers
//! that need extra fields should use [`ScgiRequest`] and the core client
//! directly.

use bytes::{Buf, Bytes};
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::BodyExt;

use crate::client;
use crate::protocol::body::ResponseBody;
use crate::protocol::{DecodeError, ScgiError, ScgiRequest, ScgiResponse};

/// An HTTP-style transport that round-trips requests over SCGI.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScgiTransport;

impl ScgiTransport {
    pub fn new() -> Self {
        Self
    }

    /// Performs one SCGI exchange for an HTTP-style request.
    ///
    /// The request URI doubles as the SCGI target address and its method
    /// becomes `REQUEST_METHOD`. The parsed status line is stored in the
    /// response extensions as a [`crate::protocol::Status`], since `http`
    /// responses carry no reason phrase of their own.
    pub async fn round_trip<B>(&self, request: Request<B>) -> Result<Response<ResponseBody>, ScgiError>
    where
        B: Body,
        B::Data: Buf,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = request.into_parts();
        let body: Bytes = body
            .collect()
            .await
            .map_err(|e| ScgiError::invalid_body(format!("collect request body: {e}")))?
            .to_bytes();

        let scgi_request = ScgiRequest::new(parts.uri, body).with_method(parts.method);

        match client::send_request(scgi_request).await {
            Ok(response) => into_http_response(response),
            // a non-200 reply is still a response at this layer
            Err(ScgiError::RejectedStatus { response }) => into_http_response(*response),
            Err(e) => Err(e),
        }
    }
}

fn into_http_response(response: ScgiResponse) -> Result<Response<ResponseBody>, ScgiError> {
    let (status, body) = response.into_parts();

    let status_code = StatusCode::from_u16(status.code())
        .map_err(|_| DecodeError::malformed_status(status.line()))?;

    let mut http_response = Response::new(body);
    *http_response.status_mut() = status_code;
    http_response.extensions_mut().insert(status);
    Ok(http_response)
}
