// src/fetch/testing.rs
// =============================================================================
// Test helpers shared by the fetch submodules:
// - StubTransport: an in-memory Transport that counts how often it is called
// - serve_once: a loopback HTTP/1.1 server that answers one request
// - unused_local_url: a URL nobody is listening on
// - LogCapture: collects tracing output as JSON lines for assertions
// =============================================================================

use super::error::{TransportError, TransportErrorKind};
use super::transport::{RawResponse, Transport};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone)]
enum Reply {
    Response(RawResponse),
    Fail(TransportErrorKind),
}

#[derive(Debug, Clone)]
pub struct StubTransport {
    reply: Reply,
    calls: Arc<AtomicUsize>,
}

impl StubTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        Self::with_reply(Reply::Response(RawResponse {
            status: Some(status),
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn without_status(body: &str) -> Self {
        Self::with_reply(Reply::Response(RawResponse {
            status: None,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn failing(kind: TransportErrorKind) -> Self {
        Self::with_reply(Reply::Fail(kind))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, _url: &Url) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Fail(kind) => Err(TransportError::new(
                *kind,
                io::Error::new(io::ErrorKind::ConnectionRefused, "stub refused"),
            )),
        }
    }
}

/// Starts a server on 127.0.0.1 that answers exactly one request with the
/// given status line and body, then closes the connection.
pub async fn serve_once(status_line: &str, body: &str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // Read until the end of the request headers; GETs have no body
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    Url::parse(&format!("http://{}/resource", addr)).expect("loopback url")
}

/// A loopback URL whose port was free a moment ago, so connecting fails.
/// Blocking bind, so it also works in tests without a runtime.
pub fn unused_local_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    Url::parse(&format!("http://{}/resource", addr)).expect("loopback url")
}

/// In-memory sink for tracing output.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's tracing events here (JSON, one per line) until
    /// the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .json()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<Value> {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("JSON log line"))
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
