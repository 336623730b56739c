// PubNub client facade
// Wires configuration, clock and transport into endpoint execution

use crate::access::{
    parse_grant_response, params::encode_value, Envelope, GrantRequest, GrantResult,
    QueryParams, SigningKeys,
};
use crate::config::PamConfig;
use crate::endpoint::{base_params, Endpoint, OperationType};
use crate::error::{PamError, PamResult};
use crate::http::{HttpTransport, Transport, TransportResponse};
use crate::logging::operation_span;
use crate::retry::RetryPolicy;
use crate::time::{SystemClock, TimestampSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// Access Manager client
pub struct PubNub {
    config: PamConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn TimestampSource>,
    retry: RetryPolicy,
}

impl PubNub {
    /// Create a client that talks to the configured origin over HTTP
    pub fn new(config: PamConfig) -> PamResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport), Arc::new(SystemClock)))
    }

    /// Create a client with a custom transport and timestamp source
    pub fn with_transport(
        config: PamConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn TimestampSource>,
    ) -> Self {
        let retry = RetryPolicy::default().with_max_attempts(config.max_attempts);
        Self {
            config,
            transport,
            clock,
            retry,
        }
    }

    /// Replace the retry policy used for transport calls
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &PamConfig {
        &self.config
    }

    /// Start a grant
    pub fn grant(&self) -> Grant<'_> {
        Grant::new(self)
    }

    /// Validate, build, send and decode one endpoint call
    pub async fn execute<E>(&self, endpoint: &E) -> PamResult<E::Output>
    where
        E: Endpoint + Sync,
    {
        let operation = endpoint.operation_type();
        let request_id = uuid::Uuid::new_v4().to_string();

        async {
            endpoint.validate_params(&self.config)?;

            let timestamp = self.clock.timestamp();
            let params = endpoint.build_query(base_params(&self.config), &self.config, timestamp)?;
            let path = endpoint.path(&self.config);
            let url = format!("{}{}?{}", self.config.base_url(), path, params.to_query_string());
            let timeout = endpoint.request_timeout(&self.config);

            debug!(path = %path, params = params.len(), "Dispatching request");
            let response = self
                .retry
                .execute_async(|| self.transport.get(&url, timeout))
                .await?;

            if !response.is_success() {
                return Err(error_from_response(&response));
            }

            let output = endpoint.create_response(&response.body)?;
            info!(operation = operation.as_str(), "Request completed");
            Ok(output)
        }
        .instrument(operation_span(operation.as_str(), &request_id))
        .await
    }
}

/// Error responses carry `{"status", "message", "error": true, ...}` when the service produced them.
fn error_from_response(response: &TransportResponse) -> PamError {
    let message = serde_json::from_slice::<Envelope<Value>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| String::from_utf8_lossy(&response.body).into_owned());
    PamError::from_status(response.status, message)
}

/// Grant endpoint bound to a client
pub struct Grant<'a> {
    client: &'a PubNub,
    request: GrantRequest,
}

impl<'a> Grant<'a> {
    fn new(client: &'a PubNub) -> Self {
        Self {
            client,
            request: GrantRequest::default(),
        }
    }

    pub fn read(mut self, read: bool) -> Self {
        self.request = self.request.read(read);
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.request = self.request.write(write);
        self
    }

    pub fn manage(mut self, manage: bool) -> Self {
        self.request = self.request.manage(manage);
        self
    }

    pub fn ttl(mut self, ttl: i64) -> Self {
        self.request = self.request.ttl(ttl);
        self
    }

    pub fn auth_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.auth_keys(keys);
        self
    }

    pub fn channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.channels(channels);
        self
    }

    pub fn channel_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.channel_groups(groups);
        self
    }

    pub fn request(&self) -> &GrantRequest {
        &self.request
    }

    pub async fn execute(self) -> PamResult<GrantResult> {
        self.client.execute(&self).await
    }
}

impl Endpoint for Grant<'_> {
    type Output = GrantResult;

    fn operation_type(&self) -> OperationType {
        OperationType::AccessManagerGrant
    }

    fn path(&self, config: &PamConfig) -> String {
        format!("/v1/auth/grant/sub-key/{}", encode_value(&config.subscribe_key))
    }

    fn build_query(
        &self,
        base: QueryParams,
        config: &PamConfig,
        timestamp: i64,
    ) -> PamResult<QueryParams> {
        let keys = SigningKeys {
            subscribe_key: &config.subscribe_key,
            publish_key: &config.publish_key,
            secret_key: config.secret_key(),
        };
        self.request.sign_params(base, keys, timestamp)
    }

    fn create_response(&self, body: &[u8]) -> PamResult<GrantResult> {
        parse_grant_response(body, &self.request.channel_groups)
    }
}
