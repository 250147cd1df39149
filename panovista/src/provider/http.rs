//! HTTP client abstraction for testability.

use super::types::ProviderError;
use tracing::{trace, warn};

/// Default User-Agent string for HTTP requests.
/// Required by some tile servers that reject requests without one.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// An HTTP response with its status preserved.
///
/// Tile servers use 4xx statuses to signal tile absence, which is a
/// normal outcome rather than a failure, so the status must survive to
/// the caller instead of being collapsed into an error.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// Trait for blocking HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] for transport-level failures
    /// (connection, timeout). Non-2xx statuses are NOT errors; callers
    /// interpret them.
    fn get(&self, url: &str) -> Result<HttpResponse, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default 30 s timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(30)
    }

    /// Creates a new ReqwestClient with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        trace!(url = url, "HTTP GET request starting");

        let response = self.client.get(url).send().map_err(|e| {
            warn!(url = url, error = %e, "HTTP request failed");
            ProviderError::Http(format!("Request failed: {}", e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::Http(format!("Failed to read response: {}", e)))?;

        trace!(url = url, status = status, bytes = body.len(), "HTTP response read");

        Ok(HttpResponse { status, body })
    }
}
