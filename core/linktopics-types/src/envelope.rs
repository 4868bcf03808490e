//! JSON envelope returned by the license verification endpoint.
//!
//! Every response, successful or not, uses the same shape:
//!
//! ```json
//! { "ok": true, "token": "<jwt>", "plan": "month" }
//! { "ok": false, "error": "subscription_not_active" }
//! ```
//!
//! Absent fields are omitted rather than serialized as `null`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::LicensePlan;

/// Machine-readable failure reason carried in `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request had no usable `session_id`.
    MissingSessionId,
    /// The session is not an active subscription or a completed payment.
    SubscriptionNotActive,
    /// Anything unexpected (provider, parsing, signing).
    ServerError,
}

impl ErrorCode {
    /// Returns the wire name of the error code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSessionId => "missing_session_id",
            Self::SubscriptionNotActive => "subscription_not_active",
            Self::ServerError => "server_error",
        }
    }

    /// HTTP status code the endpoint answers with for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::MissingSessionId => 400,
            Self::SubscriptionNotActive => 403,
            Self::ServerError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEnvelope {
    /// Whether a license was issued.
    pub ok: bool,
    /// Signed license token, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Resolved plan, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<LicensePlan>,
    /// Failure reason, present when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl VerifyEnvelope {
    /// A successful envelope carrying a freshly issued token.
    #[must_use]
    pub fn issued(token: impl Into<String>, plan: LicensePlan) -> Self {
        Self {
            ok: true,
            token: Some(token.into()),
            plan: Some(plan),
            error: None,
        }
    }

    /// A failed envelope carrying only the error code.
    #[must_use]
    pub fn failure(error: ErrorCode) -> Self {
        Self {
            ok: false,
            token: None,
            plan: None,
            error: Some(error),
        }
    }

    /// Returns the token if the envelope reports success and carries one.
    #[must_use]
    pub fn issued_token(&self) -> Option<&str> {
        if self.ok {
            self.token.as_deref().filter(|t| !t.is_empty())
        } else {
            None
        }
    }
}
