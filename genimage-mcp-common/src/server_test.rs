//! Unit tests for the server builder.

use super::server::{McpServerBuilder, ServerError, shutdown_channel};
use super::transport::Transport;

#[test]
fn test_server_error_bind_failed_display() {
    let err = ServerError::BindFailed {
        port: 8080,
        message: "Address already in use".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("8080"), "Should contain port number");
    assert!(msg.contains("Address already in use"), "Should contain error message");
}

#[test]
fn test_server_error_transport_display() {
    let err = ServerError::Transport("Connection reset".to_string());
    assert!(err.to_string().contains("Connection reset"));
}

#[test]
fn test_server_error_io_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ServerError = io_err.into();
    assert!(matches!(err, ServerError::Io(_)));
}

#[tokio::test]
async fn test_shutdown_channel_async() {
    let (tx, rx) = shutdown_channel();

    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let _ = tx.send(());
    });

    assert!(rx.await.is_ok(), "Should receive shutdown signal");
}

#[derive(Clone)]
struct EmptyHandler;

impl rmcp::ServerHandler for EmptyHandler {}

/// An HTTP server stops as soon as the shutdown channel fires.
#[tokio::test]
async fn test_http_server_stops_on_shutdown() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let (tx, rx) = shutdown_channel();
    let server = tokio::spawn(
        McpServerBuilder::new(EmptyHandler)
            .with_transport(Transport::http(port))
            .with_shutdown(rx)
            .run(),
    );

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let _ = tx.send(());

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .expect("server should stop within timeout")
        .expect("server task should not panic");
    assert!(result.is_ok(), "Server should exit cleanly: {:?}", result);
}
