//! Stripe checkout session provider.
//!
//! Uses `GET /v1/checkout/sessions/{id}?expand[]=subscription` with the
//! secret key as HTTP basic auth user.

use async_trait::async_trait;
use linktopics_types::SessionId;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CheckoutError, CheckoutResult};
use crate::session::{CheckoutMode, CheckoutSummary};
use crate::verifier::CheckoutProvider;

/// Stripe client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    /// Secret API key (`sk_live_...` / `sk_test_...`).
    pub secret_key: String,
    /// Base URL for the Stripe API (e.g. `https://api.stripe.com`).
    pub api_base_url: String,
    /// Optional request timeout. `None` keeps the HTTP client default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base_url: "https://api.stripe.com".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Stripe API response structures.
#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    mode: Option<String>,
    payment_status: Option<String>,
    customer_email: Option<String>,
    customer_details: Option<StripeCustomerDetails>,
    subscription: Option<Expandable<StripeSubscription>>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    email: Option<String>,
}

/// A field Stripe returns either as an id or, when expanded, as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expandable<T> {
    Object(T),
    #[allow(dead_code)]
    Id(String),
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    status: Option<String>,
    items: Option<StripeList<StripeSubscriptionItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct StripeList<T> {
    #[serde(default)]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscriptionItem {
    plan: Option<StripePlan>,
    price: Option<StripePrice>,
}

#[derive(Debug, Deserialize)]
struct StripePlan {
    interval: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    recurring: Option<StripeRecurring>,
}

#[derive(Debug, Deserialize)]
struct StripeRecurring {
    interval: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeCheckoutSession {
    fn into_summary(self) -> CheckoutSummary {
        let email = self
            .customer_details
            .and_then(|d| d.email)
            .filter(|e| !e.is_empty())
            .or(self.customer_email.filter(|e| !e.is_empty()));

        let subscription = match self.subscription {
            Some(Expandable::Object(sub)) => Some(sub),
            _ => None,
        };

        let (has_subscription, subscription_status, billing_interval) = match subscription {
            Some(sub) => {
                let interval = sub
                    .items
                    .and_then(|items| items.data.into_iter().next())
                    .and_then(|item| {
                        item.plan.and_then(|p| p.interval).or_else(|| {
                            item.price.and_then(|p| p.recurring).and_then(|r| r.interval)
                        })
                    });
                (true, sub.status, interval)
            }
            None => (false, None, None),
        };

        CheckoutSummary {
            session_id: self.id,
            paid: self.payment_status.as_deref() == Some("paid"),
            mode: CheckoutMode::from_provider(self.mode.as_deref()),
            has_subscription,
            subscription_status,
            billing_interval,
            email,
        }
    }
}

/// Stripe implementation of [`CheckoutProvider`].
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
}

impl StripeClient {
    /// Creates a new Stripe client.
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        if config.secret_key.is_empty() {
            return Err(CheckoutError::Config("missing Stripe secret key".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CheckoutError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Builds `{base}/v1/checkout/sessions/{id}` with the id percent-encoded
    /// as a single path segment.
    fn session_url(&self, session_id: &SessionId) -> CheckoutResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| CheckoutError::Config(format!("invalid Stripe base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CheckoutError::Config("Stripe base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "checkout", "sessions", session_id.as_str()]);
        Ok(url)
    }

    async fn fetch_session(&self, session_id: &SessionId) -> CheckoutResult<StripeCheckoutSession> {
        let url = self.session_url(session_id)?;
        debug!("Retrieving Stripe checkout session {}", session_id);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.secret_key, None::<&str>)
            .query(&[("expand[]", "subscription")])
            .send()
            .await
            .map_err(|e| CheckoutError::Network(format!("session retrieval failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Stripe throttled session retrieval for {}", session_id);
            return Err(CheckoutError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(format!("failed to read session body: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| CheckoutError::InvalidResponse(format!("failed to parse session: {e}")))
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    fn provider_name(&self) -> &'static str {
        "Stripe"
    }

    async fn retrieve_session(&self, session_id: &SessionId) -> CheckoutResult<CheckoutSummary> {
        Ok(self.fetch_session(session_id).await?.into_summary())
    }
}
