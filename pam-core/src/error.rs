// Error handling for Access Manager operations
// Signing and response-parsing failures are kept distinct from transport failures

use thiserror::Error;
use std::time::Duration;

/// Type alias for Access Manager results
pub type PamResult<T> = Result<T, PamError>;

#[derive(Debug, Error)]
pub enum PamError {
    #[error("Signing failed: {message}")]
    Signing {
        message: String,
    },

    #[error("Response parsing failed: {message}")]
    ResponseParsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        retryable: bool,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Internal server error: {message}")]
    Internal {
        message: String,
    },

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },
}

impl PamError {
    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Create a response parsing error
    pub fn response_parsing(message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a JSON decode failure, keeping its text as the message
    pub fn from_decode(context: &str, err: serde_json::Error) -> Self {
        Self::ResponseParsing {
            message: format!("{}: {}", context, err),
            source: Some(Box::new(err)),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a retryable network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
            retryable: true,
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::network(message)
    }

    /// Map an error response from the service onto a variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => PamError::InvalidArgument { message },
            401 | 403 => PamError::Forbidden { message },
            429 => PamError::RateLimited {
                message,
                retry_after: None,
            },
            500..=599 => PamError::Internal { message },
            _ => PamError::Api { status, message },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PamError::Signing { .. } => ErrorCategory::Signing,
            PamError::ResponseParsing { .. } => ErrorCategory::MalformedResponse,
            PamError::InvalidArgument { .. } => ErrorCategory::BadRequest,
            PamError::Network { .. } => ErrorCategory::Network,
            PamError::Forbidden { .. } => ErrorCategory::Forbidden,
            PamError::RateLimited { .. } => ErrorCategory::RateLimit,
            PamError::Internal { .. } => ErrorCategory::Internal,
            PamError::Api { status, .. } => ErrorCategory::from_status(*status),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            PamError::Network { retryable, .. } => *retryable,
            PamError::RateLimited { .. } => true,
            PamError::Internal { .. } => true,
            _ => false,
        }
    }

    pub fn context(&self) -> String {
        match self {
            PamError::Signing { message }
            | PamError::ResponseParsing { message, .. }
            | PamError::InvalidArgument { message }
            | PamError::Network { message, .. }
            | PamError::Forbidden { message }
            | PamError::RateLimited { message, .. }
            | PamError::Internal { message }
            | PamError::Api { message, .. } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Signing,
    MalformedResponse,
    BadRequest,
    Network,
    Forbidden,
    RateLimit,
    Internal,
    Unknown,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCategory::BadRequest,
            401 | 403 => ErrorCategory::Forbidden,
            429 => ErrorCategory::RateLimit,
            500..=599 => ErrorCategory::Internal,
            _ => ErrorCategory::Unknown,
        }
    }
}
