//! Shared type definitions for LinkTopics licensing.
//!
//! This crate defines the types that travel between the verification
//! endpoint and its clients:
//! - Checkout session identifiers
//! - Normalized license plans
//! - The JSON response envelope and its error codes
//!
//! Provider-specific shapes (Stripe sessions, subscriptions) belong in
//! `linktopics-checkout`, not here.

mod envelope;
mod ids;
mod plan;

pub use envelope::{ErrorCode, VerifyEnvelope};
pub use ids::SessionId;
pub use plan::LicensePlan;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing session id")]
    MissingSessionId,

    #[error("unknown license plan: {0}")]
    UnknownPlan(String),
}
