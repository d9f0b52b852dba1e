// src/fetch/mod.rs
// =============================================================================
// Fetch-and-decode: one GET, a strict status check, JSON into your type.
//
// Submodules:
// - target:    URL validation (nothing goes out for a bad URL)
// - transport: the HTTP seam (reqwest by default)
// - decode:    the body decoder seam (serde_json by default)
// - client:    JsonClient and the fetch_and_decode entry point
// - error:     the closed set of failures
// =============================================================================

mod client;
mod decode;
mod error;
mod target;
mod transport;

#[cfg(test)]
mod testing;

pub use client::{fetch_and_decode, ClientConfig, JsonClient};
pub use decode::{BodyDecoder, DecodeDiagnostics, JsonDecoder};
pub use error::{ErrorKind, FetchError, TransportError, TransportErrorKind};
pub use target::parse_target;
pub use transport::{RawResponse, ReqwestTransport, Transport};
