// src/fetch/error.rs
// =============================================================================
// Error types for fetch-and-decode.
//
// The set of failures is closed and small on purpose:
// - InvalidUrl:      the input never became a request
// - Transport:       the HTTP client could not complete the request
// - InvalidResponse: a response arrived but its status was not 200
// - InvalidData:     the body did not decode into the requested type
//
// Only Transport carries a payload (the underlying cause). Decode details
// go to the log, never into the error value.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Every way a single fetch can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input string is not an absolute http(s) URL. No request was sent.
    #[error("invalid URL")]
    InvalidUrl,

    /// The HTTP client could not complete the request.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A response was received but its status code was not exactly 200.
    #[error("invalid response: expected HTTP 200")]
    InvalidResponse,

    /// The response body could not be decoded into the requested type.
    #[error("invalid data: response body did not match the requested type")]
    InvalidData,
}

impl FetchError {
    /// The payload-free category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl => ErrorKind::InvalidUrl,
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::InvalidResponse => ErrorKind::InvalidResponse,
            FetchError::InvalidData => ErrorKind::InvalidData,
        }
    }
}

/// Copyable category of a [`FetchError`], handy for matching and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    Transport,
    InvalidResponse,
    InvalidData,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::Transport => "transport",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::InvalidData => "invalid_data",
        };
        f.write_str(name)
    }
}

/// Coarse reason a transport failed, derived from the client's error.
///
/// Best-effort: the exact kind for a given failure may differ between
/// platforms and TLS backends. Match on [`ErrorKind::Transport`] when you
/// need a stable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The request timed out
    Timeout,
    /// Could not connect (refused, unreachable, DNS)
    Connect,
    /// Redirect loop or too many redirects
    Redirect,
    /// TLS/certificate problem
    Tls,
    /// The connection broke while reading the body
    Body,
    /// Anything else
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "request timed out",
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Redirect => "too many redirects",
            TransportErrorKind::Tls => "TLS error",
            TransportErrorKind::Body => "failed to read response body",
            TransportErrorKind::Other => "request failed",
        };
        f.write_str(name)
    }
}

/// A failure below HTTP semantics. The original cause stays reachable
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl TransportError {
    pub fn new(
        kind: TransportErrorKind,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

// Sorts a reqwest error into one of our kinds.
//
// reqwest only exposes a few predicates, so TLS problems are spotted by
// walking the source chain and looking at the messages. The top-level
// message is skipped because it embeds the request URL.
//
// This is best-effort: message wording changes between TLS backends and
// versions. What callers can rely on is FetchError::kind() being
// ErrorKind::Transport; the TransportErrorKind is a diagnostic hint.
impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_redirect() {
            TransportErrorKind::Redirect
        } else if mentions_tls(error.source()) {
            TransportErrorKind::Tls
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };

        TransportError::new(kind, error)
    }
}

fn mentions_tls(mut current: Option<&(dyn StdError + 'static)>) -> bool {
    while let Some(err) = current {
        let text = err.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        current = err.source();
    }
    false
}
