//! Tests for the health endpoint over a real socket.

use laurel_bot::create_router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn get(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router()).await.unwrap();
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn health_answers_on_both_paths() {
    for path in ["/", "/health"] {
        let response = get(path).await;
        assert!(response.starts_with("HTTP/1.1 200"), "{path}: {response}");
        assert!(response.contains(r#"{"status":"ok"}"#));
    }
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let response = get("/metrics").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}
