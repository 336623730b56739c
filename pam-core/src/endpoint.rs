// Endpoint contract driven by `PubNub::execute`

use crate::access::QueryParams;
use crate::config::PamConfig;
use crate::error::{PamError, PamResult};
use std::time::Duration;

/// Operation tag used for logging and error context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    AccessManagerGrant,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::AccessManagerGrant => "access_manager_grant",
        }
    }
}

/// A single REST call: how to build its query and how to read its response.
pub trait Endpoint {
    type Output;

    fn operation_type(&self) -> OperationType;

    /// Checked before anything is built or sent
    fn validate_params(&self, config: &PamConfig) -> PamResult<()> {
        if config.subscribe_key.is_empty() {
            return Err(PamError::invalid_argument("subscribe key is not configured"));
        }
        Ok(())
    }

    /// Request path below the origin
    fn path(&self, config: &PamConfig) -> String;

    /// Extend the framework's base parameters with this endpoint's own
    fn build_query(
        &self,
        base: QueryParams,
        config: &PamConfig,
        timestamp: i64,
    ) -> PamResult<QueryParams>;

    /// Turn a successful response body into the endpoint's result
    fn create_response(&self, body: &[u8]) -> PamResult<Self::Output>;

    fn connect_timeout(&self, config: &PamConfig) -> Duration {
        config.connect_timeout
    }

    fn request_timeout(&self, config: &PamConfig) -> Duration {
        config.non_subscribe_request_timeout
    }
}

/// Parameters sent with every request. They precede the endpoint's own and are signed with them.
pub fn base_params(config: &PamConfig) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("pnsdk", format!("PubNub-Rust-PAM/{}", crate::version()));
    params.insert("uuid", config.uuid.clone());
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_params() {
        let config = PamConfig::builder().uuid("client-1").build();
        let params = base_params(&config);

        assert_eq!(params.get("uuid"), Some("client-1"));
        assert!(params.get("pnsdk").unwrap().starts_with("PubNub-Rust-PAM/"));
    }
}
