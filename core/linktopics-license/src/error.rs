//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Token is not a well-formed JWT.
    #[error("invalid license token format: {0}")]
    InvalidTokenFormat(String),

    /// Signature verification failed.
    #[error("license token signature invalid")]
    InvalidSignature,

    /// Claims are malformed, missing, or from another issuer.
    #[error("invalid license payload: {0}")]
    InvalidPayload(String),

    /// License has expired.
    #[error("license expired on {0}")]
    Expired(String),

    /// Token could not be signed.
    #[error("license signing failed: {0}")]
    Signing(String),

    /// Issuer or client misconfiguration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Activation failed.
    #[error("activation failed: {0}")]
    ActivationFailed(String),

    /// Network error during activation.
    #[error("network error: {0}")]
    Network(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
