// src/fetch/client.rs
// =============================================================================
// Fetch a URL and decode the JSON body into a caller-chosen type.
//
// The pipeline is linear, with no retries and no loops:
//
//   parse URL ──> one GET ──> status == 200? ──> decode ──> Ok(T)
//       │             │              │               │
//   InvalidUrl    Transport    InvalidResponse   InvalidData
//
// Three ways to get the result:
// - fetch():         async, returns the Result directly
// - fetch_with():    callback, invoked exactly once
// - fetch_channel(): a oneshot receiver that yields exactly one Result
//
// Rust concepts:
// - Generic defaults: JsonClient<C = ReqwestTransport, D = JsonDecoder>
//   so most users just write JsonClient
// - FnOnce: the callback can't be called twice, the compiler guarantees it
// - Drop: the Completion guard calls the callback if the task is dropped
//   before it finishes, so it can't be called zero times either
// =============================================================================

use super::decode::{BodyDecoder, DecodeDiagnostics, JsonDecoder};
use super::error::{FetchError, TransportError, TransportErrorKind};
use super::target::parse_target;
use super::transport::{ReqwestTransport, Transport};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::marker::PhantomData;
use std::thread;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use url::Url;

/// Knobs for a [`JsonClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub decode_diagnostics: DecodeDiagnostics,
}

/// A stateless fetch-and-decode client.
///
/// Cloning is cheap and every call is independent: nothing is cached or
/// remembered between requests.
#[derive(Debug, Clone)]
pub struct JsonClient<C = ReqwestTransport, D = JsonDecoder> {
    transport: C,
    decoder: D,
    config: ClientConfig,
}

impl JsonClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::from_parts(ReqwestTransport::new(), JsonDecoder, config)
    }
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> JsonClient<C, D>
where
    C: Transport,
    D: BodyDecoder,
{
    /// Build a client around your own transport and decoder.
    pub fn from_parts(transport: C, decoder: D, config: ClientConfig) -> Self {
        Self {
            transport,
            decoder,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch `url` with a single GET and decode the body as `T`.
    ///
    /// Only status 200 counts as success; 201, 204 and every other code
    /// yield [`FetchError::InvalidResponse`].
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let target = parse_target(url)?;
        self.fetch_target(target).await
    }

    async fn fetch_target<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.transport.get(&url).await?;

        if response.status != Some(StatusCode::OK) {
            return Err(FetchError::InvalidResponse);
        }

        self.decoder.decode(&response.body).map_err(|error| {
            if self.config.decode_diagnostics == DecodeDiagnostics::Log {
                tracing::warn!(
                    url = %url,
                    target_type = type_name::<T>(),
                    error = %error,
                    "response body did not decode into the requested type"
                );
            }
            FetchError::InvalidData
        })
    }
}

impl<C, D> JsonClient<C, D>
where
    C: Transport + Clone + 'static,
    D: BodyDecoder + Clone + 'static,
{
    /// Fetch in the background and hand the result to `on_complete`.
    ///
    /// `on_complete` runs exactly once, wherever this is called from:
    /// - invalid URL: right away on the calling thread, nothing is spawned
    /// - inside a Tokio runtime: as a task on that runtime; the callback
    ///   runs on one of its threads
    /// - outside any runtime: on a dedicated `json-fetch` thread that owns
    ///   a small current-thread runtime for this one request
    ///
    /// If the runtime shuts down before the request finishes, the callback
    /// still runs (from the thread dropping the task) with a
    /// [`FetchError::Transport`] of kind [`TransportErrorKind::Other`].
    pub fn fetch_with<T, F>(&self, url: &str, on_complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, FetchError>) + Send + 'static,
    {
        let target = match parse_target(url) {
            Ok(target) => target,
            Err(error) => return on_complete(Err(error)),
        };

        match Handle::try_current() {
            Ok(handle) => self.spawn_fetch(&handle, target, on_complete),
            Err(_) => self.spawn_fetch_thread(target, on_complete),
        }
    }

    /// Like [`JsonClient::fetch_with`], but the request and the callback
    /// run on the runtime behind `handle`. Same shutdown guarantee.
    pub fn fetch_with_on<T, F>(&self, handle: &Handle, url: &str, on_complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, FetchError>) + Send + 'static,
    {
        match parse_target(url) {
            Ok(target) => self.spawn_fetch(handle, target, on_complete),
            Err(error) => on_complete(Err(error)),
        }
    }

    /// Fetch in the background and deliver the result through a oneshot
    /// channel. Same threading rules as [`JsonClient::fetch_with`].
    pub fn fetch_channel<T>(&self, url: &str) -> oneshot::Receiver<Result<T, FetchError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.fetch_with(url, move |result| {
            // The receiver may have been dropped; nobody is left to tell
            let _ = tx.send(result);
        });
        rx
    }

    fn spawn_fetch<T, F>(&self, handle: &Handle, target: Url, on_complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, FetchError>) + Send + 'static,
    {
        let client = self.clone();
        let completion = Completion::new(on_complete);

        // If the runtime drops this task unfinished, `completion` is dropped
        // with it and reports the abandoned request
        handle.spawn(async move {
            let result = client.fetch_target(target).await;
            completion.complete(result);
        });
    }

    // No runtime to borrow: give the request its own thread and runtime
    fn spawn_fetch_thread<T, F>(&self, target: Url, on_complete: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, FetchError>) + Send + 'static,
    {
        let client = self.clone();
        let completion = Completion::new(on_complete);

        let spawned = thread::Builder::new()
            .name("json-fetch".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build();

                match runtime {
                    Ok(runtime) => {
                        let result = runtime.block_on(client.fetch_target(target));
                        completion.complete(result);
                    }
                    Err(error) => {
                        let error = TransportError::new(TransportErrorKind::Other, error);
                        completion.complete(Err(error.into()));
                    }
                }
            });

        // If the thread could not start, the closure (and the guard inside
        // it) has already been dropped, which delivered the error
        drop(spawned);
    }
}

/// Holds a callback until it is called, and calls it with an error if it
/// is dropped first (task cancelled, runtime shut down, thread never ran).
struct Completion<T, F>
where
    F: FnOnce(Result<T, FetchError>),
{
    on_complete: Option<F>,
    _result: PhantomData<fn(T)>,
}

impl<T, F> Completion<T, F>
where
    F: FnOnce(Result<T, FetchError>),
{
    fn new(on_complete: F) -> Self {
        Self {
            on_complete: Some(on_complete),
            _result: PhantomData,
        }
    }

    fn complete(mut self, result: Result<T, FetchError>) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(result);
        }
    }
}

impl<T, F> Drop for Completion<T, F>
where
    F: FnOnce(Result<T, FetchError>),
{
    fn drop(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            let error = TransportError::new(
                TransportErrorKind::Other,
                "request abandoned before completion (runtime shut down)",
            );
            on_complete(Err(error.into()));
        }
    }
}

/// One-call entry point: fetch `url` with a fresh default client and pass
/// the decoded value (or the error) to `on_complete` exactly once.
///
/// Works with or without a Tokio runtime; same threading rules and
/// shutdown guarantee as [`JsonClient::fetch_with`].
pub fn fetch_and_decode<T, F>(url: &str, on_complete: F)
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(Result<T, FetchError>) + Send + 'static,
{
    JsonClient::new().fetch_with(url, on_complete);
}
