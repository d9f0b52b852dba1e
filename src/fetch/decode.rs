// src/fetch/decode.rs
// =============================================================================
// Body decoding. The client hands the raw body to a BodyDecoder and only
// cares whether it worked; the decoder's own error is for diagnostics.
// =============================================================================

use serde::de::DeserializeOwned;
use std::fmt;

/// Converts a response body into the caller's type.
pub trait BodyDecoder: Send + Sync {
    type Error: fmt::Display;

    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Self::Error>;
}

/// Decodes bodies as JSON with serde_json. Content-Type is not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl BodyDecoder for JsonDecoder {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(body)
    }
}

/// What to do with the structural cause of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeDiagnostics {
    /// Emit a `warn` event with the URL and decoder message
    #[default]
    Log,
    /// Drop it
    Silent,
}
