//! End-to-end exchanges against in-process SCGI servers.

use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use micro_scgi::client;
use micro_scgi::protocol::{DecodeError, ScgiError, ScgiRequest, Status};
use micro_scgi::roundtrip::ScgiTransport;

/// Builds the exact wire bytes the client must produce for a default
/// request carrying `body`.
fn wire_request(body: &str) -> Vec<u8> {
    let block = format!(
        "CONTENT_LENGTH\0{}\0SCGI\01\0REQUEST_METHOD\0POST\0SERVER_PROTOCOL\0HTTP/1.1\0",
        body.len()
    );
    let mut wire = format!("{}:{}", block.len(), block).into_bytes();
    wire.push(b',');
    wire.extend_from_slice(body.as_bytes());
    wire
}

/// Spawns a single-exchange SCGI server: reads exactly `request_len` bytes,
/// writes `response`, half-closes. Returns the bound address and a handle
/// resolving to the request bytes the server saw.
async fn spawn_server(request_len: usize, response: Vec<u8>) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; request_len];
        stream.read_exact(&mut request).await.unwrap();
        stream.write_all(&response).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });

    (addr, handle)
}

#[tokio::test]
async fn tcp_exchange_succeeds() {
    let expected = wire_request("hello");
    let (addr, server) =
        spawn_server(expected.len(), b"Status: 200 OK\r\nhello back".to_vec()).await;

    let mut response = client::send(&addr.to_string(), "hello").await.unwrap();
    assert_eq!(response.status().code(), 200);
    assert_eq!(response.status().reason(), "OK");

    let body = response.body_mut().read_to_end().await.unwrap();
    assert_eq!(&body[..], b"hello back");
    response.close().await.unwrap();

    assert_eq!(server.await.unwrap(), expected);
}

#[tokio::test]
async fn non_success_status_carries_live_response() {
    let expected = wire_request("hello");
    let (addr, _server) =
        spawn_server(expected.len(), b"Status: 404 Not Found\r\nmissing\n".to_vec()).await;

    let err = client::send(&addr.to_string(), "hello").await.unwrap_err();
    assert!(matches!(err, ScgiError::RejectedStatus { .. }));

    // the dual signal: the error still hands back a readable response
    let mut response = err.into_response().unwrap();
    assert_eq!(response.status().code(), 404);
    assert_eq!(response.status().line(), "Status: 404 Not Found");

    let body = response.body_mut().read_to_end().await.unwrap();
    assert_eq!(&body[..], b"missing\n");
    response.close().await.unwrap();
}

#[tokio::test]
async fn malformed_status_line_fails() {
    let expected = wire_request("hello");
    let (addr, _server) = spawn_server(expected.len(), b"Status: banana\r\n".to_vec()).await;

    let err = client::send(&addr.to_string(), "hello").await.unwrap_err();
    match err {
        ScgiError::Decode { source: DecodeError::MalformedStatus { line } } => {
            assert_eq!(line, "Status: banana");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn close_before_status_line_is_truncated() {
    let expected = wire_request("hello");
    let (addr, _server) = spawn_server(expected.len(), Vec::new()).await;

    let err = client::send(&addr.to_string(), "hello").await.unwrap_err();
    assert!(matches!(err, ScgiError::Decode { source: DecodeError::TruncatedResponse }));
}

#[tokio::test]
async fn body_survives_chunked_server_writes() {
    let expected = wire_request("hello");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; expected.len()];
        stream.read_exact(&mut request).await.unwrap();

        stream.write_all(b"Status: 200 OK\r\n").await.unwrap();
        stream.flush().await.unwrap();
        for chunk in [&b"first "[..], &b"second "[..], &b"third"[..]] {
            stream.write_all(chunk).await.unwrap();
            stream.flush().await.unwrap();
            tokio::task::yield_now().await;
        }
        stream.shutdown().await.unwrap();
    });

    let mut response = client::send(&addr.to_string(), "hello").await.unwrap();
    let body = response.body_mut().read_to_end().await.unwrap();
    assert_eq!(&body[..], b"first second third");
    assert!(response.body().is_complete());
    response.close().await.unwrap();

    server.await.unwrap();
}

#[tokio::test]
async fn extension_fields_reach_the_wire_in_order() {
    let block = format!(
        "CONTENT_LENGTH\0{}\0SCGI\01\0REQUEST_METHOD\0POST\0SERVER_PROTOCOL\0HTTP/1.1\0REQUEST_URI\0/rpc\0QUERY_STRING\0a=1\0",
        2
    );
    let mut expected = format!("{}:{}", block.len(), block).into_bytes();
    expected.push(b',');
    expected.extend_from_slice(b"ok");

    let (addr, server) = spawn_server(expected.len(), b"Status: 200 OK\r\n".to_vec()).await;

    let request = ScgiRequest::new(addr.to_string().parse().unwrap(), "ok")
        .with_field("REQUEST_URI", "/rpc")
        .with_field("QUERY_STRING", "a=1");
    let response = client::send_request(request).await.unwrap();
    response.close().await.unwrap();

    assert_eq!(server.await.unwrap(), expected);
}

#[tokio::test]
async fn concurrent_requests_use_independent_connections() {
    let expected = wire_request("hello");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let request_len = expected.len();
    let server = tokio::spawn(async move {
        for _ in 0..2 {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; request_len];
            stream.read_exact(&mut request).await.unwrap();
            stream.write_all(b"Status: 200 OK\r\ndone").await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    let target = addr.to_string();
    let (first, second) =
        tokio::join!(client::send(&target, "hello"), client::send(&target, "hello"));

    for response in [first.unwrap(), second.unwrap()] {
        let mut response = response;
        assert_eq!(response.status().code(), 200);
        let body = response.body_mut().read_to_end().await.unwrap();
        assert_eq!(&body[..], b"done");
        response.close().await.unwrap();
    }

    server.await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn unix_socket_exchange_succeeds() {
    use tokio::net::UnixListener;

    let path = std::env::temp_dir().join(format!("micro-scgi-e2e-{}.sock", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path).unwrap();

    let expected = wire_request("hello");
    let request_len = expected.len();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; request_len];
        stream.read_exact(&mut request).await.unwrap();
        stream.write_all(b"Status: 200 OK\r\nover unix").await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });

    let mut response = client::send(path.to_str().unwrap(), "hello").await.unwrap();
    assert_eq!(response.status().code(), 200);
    let body = response.body_mut().read_to_end().await.unwrap();
    assert_eq!(&body[..], b"over unix");
    response.close().await.unwrap();

    assert_eq!(server.await.unwrap(), expected);
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn round_trip_adapts_http_types() {
    let expected = wire_request("hello");
    let (addr, server) =
        spawn_server(expected.len(), b"Status: 200 OK\r\nadapted".to_vec()).await;

    let request = http::Request::builder()
        .method(http::Method::POST)
        .uri(addr.to_string())
        .body(Full::new(Bytes::from_static(b"hello")))
        .unwrap();

    let response = ScgiTransport::new().round_trip(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);
    assert_eq!(response.extensions().get::<Status>().unwrap().reason(), "OK");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"adapted");

    assert_eq!(server.await.unwrap(), expected);
}

#[tokio::test]
async fn round_trip_returns_non_success_as_response() {
    let expected = wire_request("");
    let (addr, _server) =
        spawn_server(expected.len(), b"Status: 503 Service Unavailable\r\nbusy".to_vec()).await;

    let request = http::Request::builder()
        .method(http::Method::POST)
        .uri(addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();

    let response = ScgiTransport::new().round_trip(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::SERVICE_UNAVAILABLE);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"busy");
}

#[tokio::test]
async fn dial_failure_is_a_dial_error() {
    // bind then drop to get a port that refuses connections
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client::send(&addr.to_string(), "hello").await.unwrap_err();
    assert!(matches!(err, ScgiError::Dial { .. }));
}
