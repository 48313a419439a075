//! Async HTTP client trait and its reqwest implementation.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::error::HttpError;

/// Default User-Agent string for HTTP requests.
///
/// Some media CDNs reject requests that carry no User-Agent at all.
pub const DEFAULT_USER_AGENT: &str = concat!("coverwall/", env!("CARGO_PKG_VERSION"));

/// Default total timeout for a single request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP client operations.
///
/// Implementations must be cheap to share behind an `Arc` because every
/// fetch task of a composition request holds a reference to the same client.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request and returns the full body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an [`HttpError`] describing why no
    /// usable body was received.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Settings for constructing an [`AsyncReqwestClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total timeout per request (connect + headers + body).
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool_max_idle_per_host: 64,
        }
    }
}

impl HttpClientConfig {
    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the idle pool size per host.
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_max_idle_per_host = size;
        self
    }
}

/// Async HTTP client implementation using reqwest.
///
/// Built once per process and passed explicitly into the fetcher. Cloning is
/// cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl AsyncReqwestClient {
    /// Creates a client with default configuration (30s timeout).
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(&HttpClientConfig::default())
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        Self::with_config(&HttpClientConfig::default().with_timeout(timeout))
    }

    /// Creates a client from explicit settings.
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            // Keep connections warm across the fan-out of one request
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Returns the configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) if e.is_timeout() => {
                return Err(HttpError::Timeout(format!(
                    "{} after {:?}",
                    url, self.timeout
                )));
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_request = e.is_request(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request(e.to_string()));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HttpError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) if e.is_timeout() => Err(HttpError::Timeout(format!(
                "{} body after {:?}",
                url, self.timeout
            ))),
            Err(e) => Err(HttpError::Body(e.to_string())),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Canned response for one URL.
    #[derive(Clone)]
    struct MockResponse {
        result: Result<Vec<u8>, HttpError>,
        delay: Option<Duration>,
    }

    /// Mock async HTTP client for testing.
    ///
    /// Unknown URLs answer 404. Records every requested URL and the peak
    /// number of concurrently executing requests.
    #[derive(Clone)]
    pub struct MockAsyncHttpClient {
        responses: HashMap<String, MockResponse>,
        requested: Arc<Mutex<Vec<String>>>,
        in_flight: Arc<AtomicUsize>,
        peak_in_flight: Arc<AtomicUsize>,
    }

    impl Default for MockAsyncHttpClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
                requested: Arc::new(Mutex::new(Vec::new())),
                in_flight: Arc::new(AtomicUsize::new(0)),
                peak_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Answer `url` with `result`.
        pub fn with_response(mut self, url: &str, result: Result<Vec<u8>, HttpError>) -> Self {
            self.responses.insert(
                url.to_string(),
                MockResponse {
                    result,
                    delay: None,
                },
            );
            self
        }

        /// Answer `url` with `result` after `delay`.
        pub fn with_delayed_response(
            mut self,
            url: &str,
            result: Result<Vec<u8>, HttpError>,
            delay: Duration,
        ) -> Self {
            self.responses.insert(
                url.to_string(),
                MockResponse {
                    result,
                    delay: Some(delay),
                },
            );
            self
        }

        /// Total number of requests made.
        pub fn request_count(&self) -> usize {
            self.requested.lock().len()
        }

        /// Number of requests made for a specific URL.
        pub fn requests_for(&self, url: &str) -> usize {
            self.requested.lock().iter().filter(|u| *u == url).count()
        }

        /// Highest number of requests that were executing at once.
        pub fn peak_in_flight(&self) -> usize {
            self.peak_in_flight.load(Ordering::SeqCst)
        }
    }

    struct InFlightGuard(Arc<AtomicUsize>);

    impl Drop for InFlightGuard {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.requested.lock().push(url.to_string());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            let _guard = InFlightGuard(Arc::clone(&self.in_flight));
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let response = self.responses.get(url).cloned().unwrap_or(MockResponse {
                result: Err(HttpError::NotFound {
                    url: url.to_string(),
                }),
                delay: None,
            });

            if let Some(delay) = response.delay {
                tokio::time::sleep(delay).await;
            }

            response.result
        }
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.user_agent.starts_with("coverwall/"));
    }

    #[test]
    fn test_config_builder() {
        let config = HttpClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent")
            .with_pool_size(8);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.pool_max_idle_per_host, 8);
    }

    #[test]
    fn test_reqwest_client_keeps_timeout() {
        let client = AsyncReqwestClient::with_timeout(Duration::from_secs(7)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockAsyncHttpClient::new().with_response("http://a", Ok(vec![1, 2, 3]));

        let result = mock.get("http://a").await;
        assert_eq!(result, Ok(vec![1, 2, 3]));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_unknown_url_is_not_found() {
        let mock = MockAsyncHttpClient::new();

        let result = mock.get("http://missing").await;
        assert!(matches!(result, Err(HttpError::NotFound { .. })));
        assert_eq!(mock.requests_for("http://missing"), 1);
    }
}
