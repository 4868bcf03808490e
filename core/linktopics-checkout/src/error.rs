//! Error types for checkout verification.

use thiserror::Error;

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Errors that can occur while talking to the payment provider.
///
/// None of these are retried; callers surface them as a generic
/// server error.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Transport failure (DNS, TLS, connection reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider throttled the request.
    #[error("rate limited by payment provider")]
    RateLimited,

    /// The response body did not match the expected session shape.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration (bad base URL, missing key).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckoutError {
    /// Returns true if this error represents a 429 response.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            CheckoutError::RateLimited => true,
            CheckoutError::Api { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status reported by the provider, if any.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            CheckoutError::Api { status, .. } => Some(*status),
            CheckoutError::RateLimited => Some(429),
            _ => None,
        }
    }
}
