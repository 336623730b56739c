// Client configuration

use crate::error::{PamError, PamResult};
use crate::logging::redact;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ORIGIN: &str = "ps.pndsn.com";

/// Keys and transport settings shared by every endpoint
#[derive(Clone)]
pub struct PamConfig {
    /// Subscribe key, also part of every request path
    pub subscribe_key: String,
    /// Publish key, part of the signature input
    pub publish_key: String,
    /// Secret key used to sign Access Manager requests
    pub secret_key: Option<String>,
    /// Client identifier sent as `uuid`
    pub uuid: String,
    /// Host name of the service
    pub origin: String,
    /// Use https
    pub secure: bool,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout for everything but subscribe
    pub non_subscribe_request_timeout: Duration,
    /// Total transport attempts per request, first try included
    pub max_attempts: u32,
}

impl Default for PamConfig {
    fn default() -> Self {
        Self {
            subscribe_key: String::new(),
            publish_key: String::new(),
            secret_key: None,
            uuid: generate_uuid(),
            origin: DEFAULT_ORIGIN.to_string(),
            secure: true,
            connect_timeout: Duration::from_secs(5),
            non_subscribe_request_timeout: Duration::from_secs(10),
            max_attempts: 3,
        }
    }
}

impl fmt::Debug for PamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PamConfig")
            .field("subscribe_key", &self.subscribe_key)
            .field("publish_key", &self.publish_key)
            .field("secret_key", &self.secret_key.as_deref().map(redact))
            .field("uuid", &self.uuid)
            .field("origin", &self.origin)
            .field("secure", &self.secure)
            .field("connect_timeout", &self.connect_timeout)
            .field("non_subscribe_request_timeout", &self.non_subscribe_request_timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl PamConfig {
    /// Create a new configuration builder
    pub fn builder() -> PamConfigBuilder {
        PamConfigBuilder::default()
    }

    /// Load keys from `PUBNUB_SUBSCRIBE_KEY`, `PUBNUB_PUBLISH_KEY`,
    /// `PUBNUB_SECRET_KEY` and optionally `PUBNUB_ORIGIN`.
    pub fn from_env() -> PamResult<Self> {
        let subscribe_key = env::var("PUBNUB_SUBSCRIBE_KEY")
            .map_err(|_| PamError::invalid_argument("PUBNUB_SUBSCRIBE_KEY is not set"))?;
        let publish_key = env::var("PUBNUB_PUBLISH_KEY").unwrap_or_default();

        let mut builder = Self::builder()
            .subscribe_key(subscribe_key)
            .publish_key(publish_key);

        if let Ok(secret) = env::var("PUBNUB_SECRET_KEY") {
            builder = builder.secret_key(secret);
        }
        if let Ok(origin) = env::var("PUBNUB_ORIGIN") {
            builder = builder.origin(origin);
        }

        Ok(builder.build())
    }

    /// Secret key, treating an empty string as absent
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.origin)
    }
}

fn generate_uuid() -> String {
    format!("pn-{}", uuid::Uuid::new_v4())
}

/// Configuration builder
#[derive(Default)]
pub struct PamConfigBuilder {
    subscribe_key: Option<String>,
    publish_key: Option<String>,
    secret_key: Option<String>,
    uuid: Option<String>,
    origin: Option<String>,
    secure: Option<bool>,
    connect_timeout: Option<Duration>,
    non_subscribe_request_timeout: Option<Duration>,
    max_attempts: Option<u32>,
}

impl PamConfigBuilder {
    pub fn subscribe_key(mut self, key: impl Into<String>) -> Self {
        self.subscribe_key = Some(key.into());
        self
    }

    pub fn publish_key(mut self, key: impl Into<String>) -> Self {
        self.publish_key = Some(key.into());
        self
    }

    pub fn secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn non_subscribe_request_timeout(mut self, timeout: Duration) -> Self {
        self.non_subscribe_request_timeout = Some(timeout);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Build the configuration
    pub fn build(self) -> PamConfig {
        let default = PamConfig::default();
        PamConfig {
            subscribe_key: self.subscribe_key.unwrap_or(default.subscribe_key),
            publish_key: self.publish_key.unwrap_or(default.publish_key),
            secret_key: self.secret_key.or(default.secret_key),
            uuid: self.uuid.unwrap_or(default.uuid),
            origin: self.origin.unwrap_or(default.origin),
            secure: self.secure.unwrap_or(default.secure),
            connect_timeout: self.connect_timeout.unwrap_or(default.connect_timeout),
            non_subscribe_request_timeout: self
                .non_subscribe_request_timeout
                .unwrap_or(default.non_subscribe_request_timeout),
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts),
        }
    }
}
