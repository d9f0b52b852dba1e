// src/lib.rs
// =============================================================================
// json-fetch: fetch JSON over HTTP and decode it into a caller-chosen type.
//
//     use json_fetch::{JsonClient, FetchError};
//
//     #[derive(serde::Deserialize)]
//     struct Item { id: i64, name: String }
//
//     async fn load() -> Result<Item, FetchError> {
//         JsonClient::new().fetch("https://example.com/item.json").await
//     }
//
// The same call is available with a callback (JsonClient::fetch_with,
// fetch_and_decode) or a oneshot channel (JsonClient::fetch_channel).
// =============================================================================

pub mod fetch;
pub mod logging;

pub use fetch::{
    fetch_and_decode, ClientConfig, DecodeDiagnostics, ErrorKind, FetchError, JsonClient,
    TransportError, TransportErrorKind,
};
