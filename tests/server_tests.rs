/// Runs the real server on an ephemeral port and talks to it over TCP.
use memusers::{AppConfig, AppState, UserServer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_calls_until_shutdown() {
    let config = AppConfig::default().host("127.0.0.1").port(0).environment("test");
    let server = UserServer::new(config, AppState::in_memory());
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = stopped.await;
    }));

    let body = r#"{"name":"alice","age":30}"#;
    let created = raw_request(
        addr,
        &format!(
            "POST /users HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ),
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 201"), "{created}");
    assert!(created.contains(r#""id":1"#), "{created}");
    assert!(created.to_ascii_lowercase().contains("x-request-id:"), "{created}");

    let fetched = raw_request(
        addr,
        "GET /users/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(fetched.starts_with("HTTP/1.1 200"), "{fetched}");
    assert!(fetched.contains(r#""name":"alice""#), "{fetched}");

    // Method listing is development-only.
    let describe = raw_request(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(describe.starts_with("HTTP/1.1 404"), "{describe}");

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn bind_failure_is_reported_with_context() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let config = AppConfig::default().host("127.0.0.1").port(port);
    let server = UserServer::new(config, AppState::in_memory());

    let err = server.bind().await.unwrap_err();
    assert!(err.to_string().contains("failed to listen on 127.0.0.1:"), "{err}");
}
