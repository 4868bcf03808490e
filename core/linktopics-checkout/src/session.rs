//! Provider-agnostic view of a checkout session.

use serde::{Deserialize, Serialize};

/// How the checkout was billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// One-off payment.
    Payment,
    /// Recurring subscription.
    Subscription,
    /// Payment-method setup without a charge.
    Setup,
    /// Anything the provider adds later.
    Other,
}

impl CheckoutMode {
    /// Maps the provider's `mode` string.
    #[must_use]
    pub fn from_provider(mode: Option<&str>) -> Self {
        match mode {
            Some("payment") => Self::Payment,
            Some("subscription") => Self::Subscription,
            Some("setup") => Self::Setup,
            _ => Self::Other,
        }
    }
}

/// The only session attributes the license flow reads.
///
/// Provider responses are adapted into this shape as soon as they are
/// decoded, so upstream schema changes stop at the provider client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Provider session identifier.
    pub session_id: String,
    /// Payment status equals `paid`.
    pub paid: bool,
    /// Billing mode.
    pub mode: CheckoutMode,
    /// An expanded subscription object was attached to the session.
    pub has_subscription: bool,
    /// Status of the attached subscription (`active`, `trialing`, ...).
    pub subscription_status: Option<String>,
    /// Billing interval of the subscription's first line item.
    pub billing_interval: Option<String>,
    /// Customer email, if the session exposes one.
    pub email: Option<String>,
}

impl CheckoutSummary {
    /// A one-off checkout. Used by tests and alternative providers.
    #[must_use]
    pub fn one_off(session_id: impl Into<String>, paid: bool, email: Option<&str>) -> Self {
        Self {
            session_id: session_id.into(),
            paid,
            mode: CheckoutMode::Payment,
            has_subscription: false,
            subscription_status: None,
            billing_interval: None,
            email: email.map(String::from),
        }
    }

    /// A subscription checkout with an expanded subscription.
    #[must_use]
    pub fn subscription(
        session_id: impl Into<String>,
        status: &str,
        interval: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            paid: status == "active",
            mode: CheckoutMode::Subscription,
            has_subscription: true,
            subscription_status: Some(status.to_string()),
            billing_interval: interval.map(String::from),
            email: email.map(String::from),
        }
    }

    /// Returns true if the subscription is active or the one-off payment
    /// has completed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let subscription_active =
            self.has_subscription && self.subscription_status.as_deref() == Some("active");
        subscription_active || (self.mode == CheckoutMode::Payment && self.paid)
    }
}
