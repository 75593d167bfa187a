// components/song_metadata/src/test_server.rs
//! Single-request HTTP server for exercising the HTTP clients in tests

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct OneShotServer {
    pub base_url: String,
    request_line: oneshot::Receiver<String>,
}

impl OneShotServer {
    /// The request line (`GET /path?query HTTP/1.1`) the server received
    pub async fn request_line(self) -> String {
        self.request_line.await.unwrap()
    }
}

/// Answer exactly one request with the given status line and body
pub async fn serve_once(status: &'static str, body: Vec<u8>) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(&body).await.unwrap();
        stream.shutdown().await.ok();

        let request = String::from_utf8_lossy(&request);
        let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
    });

    OneShotServer {
        base_url: format!("http://{}", addr),
        request_line: rx,
    }
}

/// HTTP client that ignores proxy settings from the environment
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
