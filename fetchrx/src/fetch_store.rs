use crate::{
    reduce, FetchAction, FetchError, FetchState, RequestHandle, StateStore, StoreClosed,
    FAIL_FETCH, FAIL_PARSE, FAIL_PARSE_TEXT,
};
use futures_signals::signal::{MutableSignalCloned, SignalStream};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Error a body parser can return.
pub type ParseError = Box<dyn std::error::Error + Send + Sync>;

/// Pluggable second pipeline stage: raw response text to a structured
/// payload.
pub type BodyParser = Arc<dyn Fn(&str) -> Result<Value, ParseError> + Send + Sync>;

/// Strict JSON parsing. The default parser.
pub fn json_parser() -> BodyParser {
    Arc::new(|text: &str| {
        let value: Value = serde_json::from_str(text)?;
        Ok(value)
    })
}

/// Keeps the raw body as a string value without interpreting it.
pub fn text_parser() -> BodyParser {
    Arc::new(|text: &str| Ok(Value::String(text.to_owned())))
}

/// Per-request configuration, passed through to the HTTP layer.
///
/// There is no shared module-level default; every store carries its own
/// options. The defaults are a plain GET with no extra headers and no body.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Snapshot type of a [`FetchStore`]: payloads are dynamically shaped JSON
/// values, whatever the configured parser produced.
pub type JsonFetchState = FetchState<Value>;

struct Terminal {
    status: i32,
    data: Option<Value>,
    error: Option<FetchError>,
}

/// State container for a single request slot, driven by a URL dependency.
///
/// [`set_url`](FetchStore::set_url) with a changed value starts a run:
/// a `StartLoad` action is enqueued before this call returns, then a spawned
/// task drives the transport and parse stages and enqueues exactly one
/// `EndLoad`. Every failure is folded into the state; nothing is returned to
/// the caller asynchronously. A run superseded by a newer URL still finishes,
/// but its terminal update is dropped by the reducer's generation guard.
pub struct FetchStore {
    store: Arc<StateStore<JsonFetchState>>,
    client: reqwest::Client,
    options: FetchOptions,
    parser: BodyParser,
    url: Mutex<Option<String>>,
    generation: AtomicU64,
}

impl FetchStore {
    /// Store with default options and the default JSON parser.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_options(FetchOptions::default())
    }

    /// Store with explicit options. The client keeps a cookie store, so
    /// cookies ride along on every request the way a browser sends them.
    pub fn with_options(options: FetchOptions) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, options))
    }

    /// Store around an injected client, for tests or custom TLS/cookie
    /// setups.
    pub fn with_client(client: reqwest::Client, options: FetchOptions) -> Self {
        FetchStore {
            store: Arc::new(StateStore::new(FetchState::pristine())),
            client,
            options,
            parser: json_parser(),
            url: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the body parser. Changing the parser does not re-trigger a
    /// run; only the URL is a dependency.
    pub fn with_parser(mut self, parser: BodyParser) -> Self {
        self.parser = parser;
        self
    }

    /// The underlying state container, for direct observation.
    pub fn store(&self) -> Arc<StateStore<JsonFetchState>> {
        Arc::clone(&self.store)
    }

    /// Current snapshot, without waiting for queued updates.
    pub fn get_state(&self) -> JsonFetchState {
        self.store.get_state()
    }

    /// State after every currently queued update has applied.
    pub async fn await_state(&self) -> Result<JsonFetchState, StoreClosed> {
        self.store.await_state().await
    }

    pub fn to_signal(&self) -> MutableSignalCloned<JsonFetchState> {
        self.store.to_signal()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<JsonFetchState>> {
        self.store.to_stream()
    }

    /// The URL currently tracked by the slot.
    pub fn url(&self) -> Option<String> {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The URL dependency. A changed value starts a new run; an identical
    /// value is a no-op. Options and parser identity are not tracked: to
    /// re-fetch with different options, change the URL or build a new store.
    pub fn set_url(&self, url: impl Into<String>) -> Result<(), StoreClosed> {
        let url = url.into();
        let mut current = self.url.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(url.as_str()) {
            debug!(%url, "url unchanged, not re-fetching");
            return Ok(());
        }
        *current = Some(url.clone());
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.start_run(url, generation)
    }

    fn start_run(&self, url: String, generation: u64) -> Result<(), StoreClosed> {
        let client = self.client.clone();
        let options = self.options.clone();
        let parser = Arc::clone(&self.parser);
        let store = Arc::clone(&self.store);

        let (armed_tx, armed_rx) = tokio::sync::oneshot::channel::<()>();
        let task_url = url.clone();
        let task = tokio::spawn(async move {
            // The start-load below must be on the queue before this task can
            // produce its terminal update.
            let _ = armed_rx.await;
            let terminal = run_stages(&client, &options, parser, &task_url).await;
            let _ = store.set_state(move |state| {
                reduce(
                    state,
                    FetchAction::EndLoad {
                        generation,
                        status: terminal.status,
                        data: terminal.data,
                        error: terminal.error,
                    },
                )
            });
        });

        let handle = RequestHandle::from(task.abort_handle());
        self.store.set_state(move |state| {
            reduce(
                state,
                FetchAction::StartLoad {
                    url,
                    generation,
                    handle: Some(handle),
                },
            )
        })?;
        let _ = armed_tx.send(());
        Ok(())
    }
}

/// Transport stage, then parse stage. Always produces exactly one terminal
/// payload; every failure is mapped to its status sentinel here.
async fn run_stages(
    client: &reqwest::Client,
    options: &FetchOptions,
    parser: BodyParser,
    url: &str,
) -> Terminal {
    debug!(%url, method = %options.method, "issuing request");
    let mut request = client
        .request(options.method.clone(), url)
        .headers(options.headers.clone());
    if let Some(body) = &options.body {
        request = request.body(body.clone());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(%url, error = %err, "transport failure");
            return Terminal {
                status: FAIL_FETCH,
                data: None,
                error: Some(FetchError::Transport {
                    inner: err.to_string(),
                }),
            };
        }
    };

    let status = response.status();
    // A non-2xx response is recorded but not fatal: a parseable body still
    // surfaces as data next to the error.
    let http_error = (!status.is_success()).then(|| FetchError::HttpStatus(status.as_u16()));

    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            warn!(%url, error = %err, "reading response body failed");
            return Terminal {
                status: FAIL_PARSE_TEXT,
                data: None,
                error: Some(FetchError::BodyRead {
                    inner: err.to_string(),
                }),
            };
        }
    };
    debug!(%url, status = status.as_u16(), bytes = text.len(), "response received");

    if text.is_empty() {
        // Nothing to parse; the raw (empty) body is the payload.
        return Terminal {
            status: i32::from(status.as_u16()),
            data: Some(Value::String(text)),
            error: http_error,
        };
    }
    match (*parser)(&text) {
        Ok(data) => Terminal {
            status: i32::from(status.as_u16()),
            data: Some(data),
            error: http_error,
        },
        Err(err) => {
            warn!(%url, error = %err, "body parser failed");
            Terminal {
                status: FAIL_PARSE,
                data: None,
                error: Some(FetchError::Parse {
                    raw: text,
                    inner: err.to_string(),
                }),
            }
        }
    }
}
