//! Market page retrieval.
//!
//! `PageSource` abstracts "return the full document text or a typed failure"
//! so the scheduler can be driven by the real HTTP fetcher or by a scripted
//! source in tests.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FetchError, FetchResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Default market page.
pub const DEFAULT_URL: &str = "https://coinmarketcap.com/";

/// Source of raw market page markup.
pub trait PageSource: Send + Sync {
    /// Retrieve the complete document.
    fn fetch(&self) -> BoxFuture<'_, FetchResult<String>>;

    /// Human-readable origin, for logs and status lines.
    fn describe(&self) -> String;
}

/// HTTP fetcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Page to poll.
    #[serde(default = "default_url")]
    pub url: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header; some market pages refuse bare clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (X11; Linux x86_64) crypts/{}",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fetches the market page with a single `GET` per call.
pub struct HttpFetcher {
    client: Client,
    url: String,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Create a new fetcher.
    pub fn new(config: &FetcherConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(format!("Failed to create HTTP client: {e}")))?;

        info!(url = %config.url, timeout_secs = config.timeout_secs, "HTTP fetcher ready");

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_page(&self) -> FetchResult<String> {
        debug!(url = %self.url, "Fetching market page");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        debug!(bytes = body.len(), "Market page received");
        Ok(body)
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if error.is_builder() {
            FetchError::Client(error.to_string())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self) -> BoxFuture<'_, FetchResult<String>> {
        Box::pin(self.get_page())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Scripted page source for testing.
///
/// Returns queued responses in order, then repeats the fallback page.
#[derive(Debug)]
pub struct MockPageSource {
    queue: Mutex<VecDeque<FetchResult<String>>>,
    fallback: Mutex<Option<String>>,
    calls: AtomicU64,
    delay: Duration,
}

impl MockPageSource {
    /// Create a source that always returns `page`.
    pub fn with_page(page: impl Into<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Some(page.into())),
            calls: AtomicU64::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Create a source with no fallback; calls past the queue fail.
    pub fn scripted(responses: Vec<FetchResult<String>>) -> Self {
        Self {
            queue: Mutex::new(responses.into()),
            fallback: Mutex::new(None),
            calls: AtomicU64::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Simulate network latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue one more response ahead of the fallback.
    pub fn push(&self, response: FetchResult<String>) {
        self.queue.lock().push_back(response);
    }

    /// Replace the fallback page.
    pub fn set_fallback(&self, page: Option<String>) {
        *self.fallback.lock() = page;
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> FetchResult<String> {
        if let Some(response) = self.queue.lock().pop_front() {
            return response;
        }
        self.fallback
            .lock()
            .clone()
            .ok_or_else(|| FetchError::Transport("mock source exhausted".to_string()))
    }
}

impl PageSource for MockPageSource {
    fn fetch(&self) -> BoxFuture<'_, FetchResult<String>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.next_response()
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
