//! Vendor feed HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::error::FeedError;

/// Default vendor GTFS-R endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.nationaltransport.ie/gtfsr/v2/gtfsr";

/// Default request timeout. Bounds how long a hung vendor call can block
/// cache callers waiting behind the refresh lock.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the vendor feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API key sent as the `x-api-key` header.
    pub api_key: String,
    /// Upstream endpoint URL.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl FeedConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The fetch seam the cache refreshes through. Implemented by the real
/// client below and by counting fakes in tests.
#[async_trait]
pub trait FeedFetch: Send + Sync {
    /// Perform exactly one upstream fetch attempt. No retries.
    async fn fetch(&self) -> Result<Bytes, FeedError>;
}

/// HTTP client for the vendor's real-time feed.
pub struct VendorFeedClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VendorFeedClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl FeedFetch for VendorFeedClient {
    async fn fetch(&self) -> Result<Bytes, FeedError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
