//! Configurable HTTP client for operation catalogs and type lookups.
//!
//! The service answers a `GET` with its operation catalog and a `PATCH`
//! carrying `{ "t": kind, "n": name }` with the definition of one type.

use crate::{ClientError, Result};
use catalog_synth::{OperationCatalog, TypeKind};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Default timeout for a single request (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default number of retry attempts.
const DEFAULT_RETRIES: u32 = 0;

/// A configurable client for a catalog service.
///
/// The client supports:
/// - Custom HTTP headers (e.g., for authentication)
/// - Configurable request timeout
/// - Automatic retry with exponential backoff
///
/// # Examples
///
/// ```no_run
/// use catalog_client::CatalogClient;
/// use catalog_synth::TypeKind;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CatalogClient::new()
///     .with_header("Authorization", "Bearer my-token")
///     .with_timeout(Duration::from_secs(60))
///     .with_retries(3);
///
/// let catalog = client.fetch_catalog("https://api.example.com/api").await?;
/// let user = client
///     .fetch_type("https://api.example.com/api", TypeKind::Output, "User")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    headers: HashMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
    retries: u32,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Creates a client with default settings.
    ///
    /// Default settings:
    /// - 30 second request timeout
    /// - 10 second connection timeout
    /// - No retries
    /// - No custom headers
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
        }
    }

    /// Adds an HTTP header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds multiple HTTP headers from an iterator.
    ///
    /// ```no_run
    /// # use catalog_client::CatalogClient;
    /// let headers = vec![
    ///     ("Authorization", "Bearer token"),
    ///     ("X-Request-ID", "12345"),
    /// ];
    /// let client = CatalogClient::new().with_headers(headers);
    /// ```
    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Sets the request timeout (connection + transfer). Default is 30 seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout. Default is 10 seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the number of retry attempts on failure.
    ///
    /// Retries use exponential backoff starting at 1 second.
    /// Default is 0 (no retries).
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Fetches and decodes the operation catalog served at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The network request fails after all retry attempts
    /// - The server returns an HTTP error status
    /// - The body is not a valid operation catalog
    #[tracing::instrument(skip(self))]
    pub async fn fetch_catalog(&self, url: &str) -> Result<OperationCatalog> {
        let json = self.fetch_catalog_raw(url).await?;
        let catalog: OperationCatalog = serde_json::from_value(json).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode operation catalog");
            ClientError::Parse(e.to_string())
        })?;

        tracing::info!(groups = catalog.len(), "Catalog fetched");
        Ok(catalog)
    }

    /// Fetches the catalog served at `url` as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts, the
    /// server returns an HTTP error status, or the body is not JSON.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_catalog_raw(&self, url: &str) -> Result<serde_json::Value> {
        self.send_with_retry(|| self.get_once(url)).await
    }

    /// Looks up the definition of one type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] if the service answers `null`, and
    /// the same transport errors as [`Self::fetch_catalog_raw`] otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_type(
        &self,
        url: &str,
        kind: TypeKind,
        name: &str,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "t": kind.code(), "n": name });
        let definition = self
            .send_with_retry(|| self.patch_once(url, &body))
            .await?;

        if definition.is_null() {
            return Err(ClientError::Invalid(format!("no definition for {kind} type {name}")));
        }
        Ok(definition)
    }

    /// Runs `request` until it succeeds, fails with a non-retryable error, or
    /// the retries are used up.
    async fn send_with_retry<F, Fut>(&self, mut request: F) -> Result<serde_json::Value>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<serde_json::Value>>,
    {
        let mut last_error = None;
        let attempts = self.retries + 1;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1)); // 1s, 2s, 4s, ...
                tracing::info!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            match request().await {
                Ok(json) => return Ok(json),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Request failed");
                    let retryable = Self::is_retryable(&e);
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::Network("No attempts made".to_string())))
    }

    fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {e}")))
    }

    fn with_custom_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        request
    }

    async fn get_once(&self, url: &str) -> Result<serde_json::Value> {
        let request = self.with_custom_headers(self.http_client()?.get(url));
        tracing::debug!("Requesting operation catalog");
        Self::read_json(request).await
    }

    async fn patch_once(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let request = self.with_custom_headers(
            self.http_client()?
                .patch(url)
                .header("Content-Type", "application/json")
                .json(body),
        );
        tracing::debug!(%body, "Requesting type definition");
        Self::read_json(request).await
    }

    async fn read_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %error_body, "HTTP error response");
            return Err(ClientError::Http(status.as_u16(), error_body));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse response body");
            ClientError::Parse(e.to_string())
        })
    }

    /// Network errors and 5xx server errors are retryable.
    /// Parse errors, 4xx client errors, and invalid responses are not.
    fn is_retryable(error: &ClientError) -> bool {
        match error {
            ClientError::Network(_) => true,
            ClientError::Http(status, _) => *status >= 500,
            ClientError::Parse(_) | ClientError::Invalid(_) => false,
        }
    }
}
