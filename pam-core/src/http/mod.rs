// HTTP transport for REST calls
// The core only needs GET with a per-request timeout

use crate::config::PamConfig;
use crate::error::{PamError, PamResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Raw response handed back to the endpoint layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> PamResult<TransportResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &PamConfig) -> PamResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .pool_max_idle_per_host(32)
            .user_agent(concat!("pam-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_setup_error)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> PamResult<TransportResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PamError::network(format!("Failed to read response: {}", e)))?
            .to_vec();

        debug!(status, bytes = body.len(), "Response received");
        Ok(TransportResponse { status, body })
    }
}

fn map_setup_error(e: reqwest::Error) -> PamError {
    PamError::Network {
        message: format!("Failed to build HTTP client: {}", e),
        source: Some(Box::new(e)),
        retryable: false,
    }
}

fn map_send_error(e: reqwest::Error) -> PamError {
    if e.is_timeout() {
        PamError::timeout(format!("Request timeout: {}", e))
    } else if e.is_connect() {
        PamError::network(format!("Connection failed: {}", e))
    } else {
        PamError::Network {
            message: format!("Network error: {}", e),
            source: Some(Box::new(e)),
            retryable: false,
        }
    }
}
