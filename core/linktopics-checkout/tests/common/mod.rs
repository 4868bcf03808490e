//! Shared test helpers for checkout tests.

#![allow(dead_code)]

use async_trait::async_trait;
use linktopics_checkout::{CheckoutError, CheckoutProvider, CheckoutResult, CheckoutSummary};
use linktopics_types::SessionId;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A provider that returns a canned summary (or failure) and counts calls.
pub struct FakeProvider {
    response: Option<CheckoutSummary>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn returning(summary: CheckoutSummary) -> Self {
        Self {
            response: Some(summary),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    fn provider_name(&self) -> &'static str {
        "Fake"
    }

    async fn retrieve_session(&self, _session_id: &SessionId) -> CheckoutResult<CheckoutSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| CheckoutError::Network("connection reset".to_string()))
    }
}

/// Stripe JSON for a subscription checkout with an expanded subscription.
pub fn subscription_session_json(id: &str, status: &str, interval: &str, email: &str) -> Value {
    json!({
        "id": id,
        "object": "checkout.session",
        "mode": "subscription",
        "payment_status": "paid",
        "customer_details": { "email": email },
        "customer_email": null,
        "subscription": {
            "id": "sub_123",
            "object": "subscription",
            "status": status,
            "items": {
                "object": "list",
                "data": [
                    { "id": "si_1", "plan": { "id": "price_1", "interval": interval } }
                ]
            }
        }
    })
}

/// Stripe JSON for a one-off payment checkout.
pub fn payment_session_json(id: &str, payment_status: &str, email: Option<&str>) -> Value {
    json!({
        "id": id,
        "object": "checkout.session",
        "mode": "payment",
        "payment_status": payment_status,
        "customer_details": email.map(|e| json!({ "email": e })),
        "subscription": null
    })
}
