//! End-to-end tests over real sockets

use std::net::SocketAddr;
use std::thread::JoinHandle;
use std::time::Duration;

use switchyard::config::Config;
use switchyard::server::{Server, ServerHandle};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

mod common;
use common::{expected_response, site_handler};

const WAIT: Duration = Duration::from_secs(5);

struct TestServer {
    addr: SocketAddr,
    handle: ServerHandle,
    thread: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    fn start(cfg: Config) -> Self {
        let mut server = Server::bind(&cfg, site_handler()).unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.handle();
        let thread = std::thread::spawn(move || server.run());

        Self {
            addr,
            handle,
            thread: Some(thread),
        }
    }

    fn spawn() -> Self {
        Self::start(Config {
            listen_addr: "127.0.0.1:0".to_string(),
            ..Config::default()
        })
    }

    fn stop(mut self) {
        self.handle.shutdown().unwrap();
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap().unwrap();
        }
    }
}

/// Sends a full request, half-closes, and reads until the server closes.
async fn exchange(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut buf = Vec::new();
    timeout(WAIT, stream.read_to_end(&mut buf))
        .await
        .expect("server did not close the connection")
        .unwrap();
    String::from_utf8(buf).unwrap()
}

async fn read_exactly(stream: &mut TcpStream, len: usize) -> String {
    let mut buf = vec![0u8; len];
    timeout(WAIT, stream.read_exact(&mut buf))
        .await
        .expect("response did not arrive")
        .unwrap();
    String::from_utf8(buf).unwrap()
}

async fn assert_silent(stream: &mut TcpStream) {
    let mut byte = [0u8; 1];
    let read = timeout(Duration::from_millis(200), stream.read(&mut byte)).await;
    assert!(read.is_err(), "server responded before the request was complete");
}

#[tokio::test]
async fn test_serves_leaf_route() {
    let server = TestServer::spawn();

    let response = exchange(server.addr, b"GET /about HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(response, expected_response("HTTP/1.1 200 OK", "<h1>About</h1>"));

    server.stop();
}

#[tokio::test]
async fn test_serves_root_and_directory_index() {
    let server = TestServer::spawn();

    let root = exchange(server.addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(root, expected_response("HTTP/1.1 200 OK", "<h1>Home</h1>"));

    let blog = exchange(server.addr, b"GET /blog HTTP/1.1\r\n\r\n").await;
    assert_eq!(blog, expected_response("HTTP/1.1 200 OK", "<h1>Blog</h1>"));

    server.stop();
}

#[tokio::test]
async fn test_error_statuses() {
    let server = TestServer::spawn();

    let missing = exchange(server.addr, b"GET /missing HTTP/1.1\r\n\r\n").await;
    assert_eq!(missing, expected_response("HTTP/1.1 404 Not Found", "404 Not Found"));

    let post = exchange(server.addr, b"POST / HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        post,
        expected_response("HTTP/1.1 405 Method Not Allowed", "405 Method Not Allowed")
    );

    let malformed = exchange(server.addr, b"\r\n\r\n").await;
    assert_eq!(
        malformed,
        expected_response("HTTP/1.1 400 Bad Request", "400 Bad Request")
    );

    server.stop();
}

#[tokio::test]
async fn test_request_across_two_bursts() {
    let server = TestServer::spawn();
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream.write_all(b"GET /about HTTP/1.1\r\n").await.unwrap();
    assert_silent(&mut stream).await;

    stream.write_all(b"\r\n").await.unwrap();
    stream.shutdown().await.unwrap();

    let mut buf = Vec::new();
    timeout(WAIT, stream.read_to_end(&mut buf)).await.unwrap().unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        expected_response("HTTP/1.1 200 OK", "<h1>About</h1>")
    );

    server.stop();
}

#[tokio::test]
async fn test_connection_serves_consecutive_requests() {
    let server = TestServer::spawn();
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    let first = expected_response("HTTP/1.1 200 OK", "<h1>Home</h1>");
    stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    assert_eq!(read_exactly(&mut stream, first.len()).await, first);

    let second = expected_response("HTTP/1.1 200 OK", "<p>First post</p>");
    stream.write_all(b"GET /blog/post1 HTTP/1.1\r\n\r\n").await.unwrap();
    assert_eq!(read_exactly(&mut stream, second.len()).await, second);

    server.stop();
}

#[tokio::test]
async fn test_slow_client_does_not_block_others() {
    let server = TestServer::spawn();

    let mut slow = TcpStream::connect(server.addr).await.unwrap();
    slow.write_all(b"GET /about HTT").await.unwrap();

    let fast = exchange(server.addr, b"GET /blog HTTP/1.1\r\n\r\n").await;
    assert_eq!(fast, expected_response("HTTP/1.1 200 OK", "<h1>Blog</h1>"));

    slow.write_all(b"P/1.1\r\n\r\n").await.unwrap();
    let expected = expected_response("HTTP/1.1 200 OK", "<h1>About</h1>");
    assert_eq!(read_exactly(&mut slow, expected.len()).await, expected);

    server.stop();
}

#[tokio::test]
async fn test_many_concurrent_clients() {
    let server = TestServer::spawn();

    let clients: Vec<_> = (0..16)
        .map(|i| {
            let addr = server.addr;
            tokio::spawn(async move {
                let path = if i % 2 == 0 { "/about" } else { "/nowhere" };
                let request = format!("GET {path} HTTP/1.1\r\n\r\n");
                (i, exchange(addr, request.as_bytes()).await)
            })
        })
        .collect();

    for client in clients {
        let (i, response) = client.await.unwrap();
        if i % 2 == 0 {
            assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        } else {
            assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        }
    }

    server.stop();
}

#[tokio::test]
async fn test_idle_connection_is_closed_after_timeout() {
    let server = TestServer::start(Config {
        listen_addr: "127.0.0.1:0".to_string(),
        idle_timeout_secs: Some(1),
        ..Config::default()
    });
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    let mut buf = Vec::new();
    timeout(WAIT, stream.read_to_end(&mut buf))
        .await
        .expect("idle connection was not closed")
        .unwrap();
    assert!(buf.is_empty());

    server.stop();
}

#[tokio::test]
async fn test_shutdown_stops_the_loop() {
    let server = TestServer::spawn();
    let addr = server.addr;

    server.stop();

    assert!(TcpStream::connect(addr).await.is_err());
}
