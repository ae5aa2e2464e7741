//! HTTP client utilities for TurboCommerce.
//!
//! Provides a small builder API for outbound requests with automatic JSON
//! handling, a per-request timeout and bounded retries for transient failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Stock {
//!     id: u64,
//!     amount: i64,
//! }
//!
//! let client = FetchClient::new().with_base_url("http://localhost:3333");
//!
//! let stock: Stock = client.get_json("/stock/1").await?;
//!
//! let response = client
//!     .get("/products/1")
//!     .header("Accept", "application/json")
//!     .send()
//!     .await?;
//! ```

mod error;
mod request;
mod response;
mod retry;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub use error::FetchError;
pub use request::RequestBuilder;
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for making outbound requests.
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request. Relative URLs are joined to the base URL.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self.clone(),
            builder,
        }
    }

    /// GET `url` and decode a 2xx JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: impl Into<String>) -> Result<T, FetchError> {
        self.get(url).send().await?.error_for_status()?.json()
    }

    async fn execute(&self, request: &RequestBuilder) -> Result<Response, FetchError> {
        let mut outbound = self
            .http
            .get(request.url.as_str())
            .timeout(self.timeout);
        for (key, value) in &request.headers {
            outbound = outbound.header(key.as_str(), value.as_str());
        }

        let response = outbound.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response::new(status, headers, body))
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    client: FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// The fully resolved URL.
    pub fn url(&self) -> &str {
        self.builder.url()
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Send the request, retrying transient failures under the client's
    /// [`RetryPolicy`].
    ///
    /// A non-2xx response is returned as `Ok` once retries are exhausted; use
    /// [`Response::error_for_status`] to turn it into an error.
    pub async fn send(self) -> Result<Response, FetchError> {
        let Self { client, builder } = self;
        let mut attempt = 0;

        loop {
            match client.execute(&builder).await {
                Ok(response) if client.retry.should_retry_status(response.status, attempt) => {
                    tracing::debug!(
                        url = %builder.url,
                        status = response.status,
                        attempt,
                        "retrying after server error"
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if client.retry.should_retry_error(&e, attempt) => {
                    tracing::debug!(url = %builder.url, error = %e, attempt, "retrying after transport error");
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(client.retry.backoff.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Response, RetryPolicy};
}
