//! Markup retrieval with a swappable fetcher seam and retry decoration.
//!
//! # Architecture
//!
//! The module uses a trait-based design so everything above the network
//! boundary is testable against canned markup:
//! - [`FetchMarkup`]: core trait defining one markup retrieval
//! - [`HttpFetcher`]: the real implementation over a shared `reqwest` client
//! - [`RetryFetch`]: decorator adding bounded retries to any [`FetchMarkup`]
//!
//! # Retry strategy
//!
//! Only transient failures (transport errors, 5xx) are retried; 4xx answers
//! fail immediately. Delays follow exponential backoff from the base delay,
//! capped, with 0-250ms of random jitter.

use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// The ranking service rejects requests with default/empty agents, so every
/// request identifies as a mainstream browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout. A timed-out fetch surfaces as a transport failure
/// like any other; it never stalls sibling fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Trait for retrieving the markup behind one URL.
///
/// Implementors perform exactly one logical retrieval per call and carry no
/// mutable state, so one fetcher may be shared across concurrent in-flight
/// requests.
pub trait FetchMarkup {
    /// Retrieve the markup at `url`.
    ///
    /// Returns the response body as text when the remote status indicates
    /// success (2xx), a [`FetchError`] otherwise.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// The real fetcher: one shared `reqwest::Client` with connection pooling,
/// a browser `User-Agent`, and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the standard client configuration.
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchMarkup for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Fetch answered non-success status");
            return Err(FetchError::Status { status });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched markup"
        );
        Ok(body)
    }
}

/// Decorator that adds bounded retries to any [`FetchMarkup`] implementation.
///
/// The delay between attempts follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<F> {
    /// The underlying fetcher to wrap.
    inner: F,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: Duration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: Duration,
}

impl<F> RetryFetch<F>
where
    F: FetchMarkup,
{
    /// Wrap `inner` with retry behavior.
    pub fn new(inner: F, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl<F> fmt::Debug for RetryFetch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<F> FetchMarkup for RetryFetch<F>
where
    F: FetchMarkup,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !e.is_transient() {
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "Fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub fetcher that fails a configured number of times before
    /// succeeding.
    struct FlakyFetcher {
        failures: usize,
        transient: bool,
        calls: AtomicUsize,
    }

    impl FetchMarkup for FlakyFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                let status = if self.transient {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::NOT_FOUND
                };
                Err(FetchError::Status { status })
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let inner = FlakyFetcher {
            failures: 2,
            transient: true,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(inner, 3, Duration::from_millis(1));

        let body = fetcher.fetch("http://example.invalid/").await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let inner = FlakyFetcher {
            failures: 10,
            transient: true,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(inner, 2, Duration::from_millis(1));

        let err = fetcher.fetch("http://example.invalid/").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        // initial attempt + 2 retries
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_deterministic_status() {
        let inner = FlakyFetcher {
            failures: 10,
            transient: false,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(inner, 3, Duration::from_millis(1));

        let err = fetcher.fetch("http://example.invalid/").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                status: StatusCode::NOT_FOUND
            }
        ));
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 1);
    }
}
