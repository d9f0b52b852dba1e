// src/fetch/transport.rs
// =============================================================================
// The HTTP seam. The client only needs "GET this URL, give me status + body",
// so that is all the Transport trait asks for. The default implementation
// uses reqwest; tests plug in their own.
//
// Rust concepts:
// - async-trait: lets a trait have async methods whose futures are Send,
//   so a generic client can be moved into tokio::spawn
// - Clone: reqwest::Client is an Arc inside, so cloning is cheap
// =============================================================================

use super::error::TransportError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// What came back from the server, before any HTTP semantics are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// `None` when the transport could not tell us a status.
    pub status: Option<StatusCode>,
    pub body: Vec<u8>,
}

/// Issues a single GET request. No headers, no body, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError>;
}

/// Transport backed by a `reqwest::Client` with its default settings.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client, e.g. one shared with the rest of an app.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        // A connection dropped mid-body is still a transport failure
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status: Some(status),
            body,
        })
    }
}
