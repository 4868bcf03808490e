//! HTTP endpoint exchanging a checkout session for a license token.
//!
//! `GET /api/stripe-verify?session_id=<id>` runs a single-shot state machine:
//!
//! ```text
//! AwaitingInput ──missing id──────────────▶ Rejected (400 missing_session_id)
//!       │
//!       ▼
//!   Verifying ──inactive──────────────────▶ Rejected (403 subscription_not_active)
//!       │      ──provider error───────────▶ Failed   (500 server_error)
//!       ▼
//!    Issuing ──signing error──────────────▶ Failed   (500 server_error)
//!       │
//!       ▼
//!   200 { ok: true, token, plan }
//! ```
//!
//! Requests share no mutable state; repeating a request re-verifies the
//! session and signs a fresh token.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use linktopics_checkout::{verify_session, CheckoutProvider, StripeClient, StripeConfig};
use linktopics_license::{
    IssuerConfig, JwtLicenseIssuer, LicenseSigner, SESSION_ID_PARAM, UNKNOWN_SUBJECT,
};
use linktopics_types::{ErrorCode, LicensePlan, SessionId, VerifyEnvelope};
use tracing::{debug, error, info, warn};

/// Path the marketing site calls after checkout.
pub const VERIFY_PATH: &str = "/api/stripe-verify";

/// Alias of [`VERIFY_PATH`].
pub const VERIFY_ALIAS_PATH: &str = "/verify-license";

/// Collaborators injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CheckoutProvider>,
    pub signer: Arc<dyn LicenseSigner>,
}

impl AppState {
    /// Builds the production state: Stripe provider and JWT issuer.
    pub fn from_config(stripe: StripeConfig, issuer: IssuerConfig) -> Result<Self> {
        let provider = StripeClient::new(stripe).context("Failed to create Stripe client")?;
        let signer = JwtLicenseIssuer::new(issuer).context("Failed to create license issuer")?;
        Ok(Self {
            provider: Arc::new(provider),
            signer: Arc::new(signer),
        })
    }
}

/// Terminal state of one verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// A license was signed.
    Issued { token: String, plan: LicensePlan },
    /// The request or the session was refused.
    Rejected(ErrorCode),
    /// Something unexpected happened upstream or while signing.
    Failed,
}

impl VerifyOutcome {
    /// HTTP status for this outcome.
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Issued { .. } => 200,
            Self::Rejected(code) => code.http_status(),
            Self::Failed => ErrorCode::ServerError.http_status(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// JSON body for this outcome.
    pub fn envelope(&self) -> VerifyEnvelope {
        match self {
            Self::Issued { token, plan } => VerifyEnvelope::issued(token.clone(), *plan),
            Self::Rejected(code) => VerifyEnvelope::failure(*code),
            Self::Failed => VerifyEnvelope::failure(ErrorCode::ServerError),
        }
    }
}

impl IntoResponse for VerifyOutcome {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Runs the verification state machine for one request.
pub async fn run_verification(state: &AppState, session_id: Option<&str>) -> VerifyOutcome {
    // AwaitingInput
    let Ok(session_id) = SessionId::from_query(session_id) else {
        debug!("Verification request without session id");
        return VerifyOutcome::Rejected(ErrorCode::MissingSessionId);
    };

    // Verifying
    let verification = match verify_session(state.provider.as_ref(), &session_id).await {
        Ok(v) => v,
        Err(e) => {
            error!("Checkout verification failed for {}: {}", session_id, e);
            return VerifyOutcome::Failed;
        }
    };

    if !verification.active {
        warn!("Session {} is not active; no license issued", session_id);
        return VerifyOutcome::Rejected(ErrorCode::SubscriptionNotActive);
    }

    // Issuing
    let plan = verification.plan();
    let subject = verification
        .session
        .email
        .as_deref()
        .unwrap_or(UNKNOWN_SUBJECT);

    match state.signer.sign(subject, plan) {
        Ok(issued) => {
            info!("Issued {} license for session {}", plan, session_id);
            VerifyOutcome::Issued {
                token: issued.token,
                plan,
            }
        }
        Err(e) => {
            error!("License signing failed for {}: {}", session_id, e);
            VerifyOutcome::Failed
        }
    }
}

/// First `session_id` in the query string. Repeated parameters resolve the
/// same way on the client side.
fn first_session_id(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == SESSION_ID_PARAM)
        .map(|(_, value)| value)
}

async fn verify_license_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> VerifyOutcome {
    let session_id = query.ok().and_then(|Query(pairs)| first_session_id(pairs));
    run_verification(&state, session_id.as_deref()).await
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(VERIFY_PATH, get(verify_license_handler))
        .route(VERIFY_ALIAS_PATH, get(verify_license_handler))
        .with_state(state)
}
