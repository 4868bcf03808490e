//! Shared helpers for endpoint tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use linktopics_api::{build_router, AppState};
use linktopics_checkout::{CheckoutError, CheckoutProvider, CheckoutResult, CheckoutSummary};
use linktopics_license::{Clock, IssuerConfig, JwtLicenseIssuer, LicenseVerifier, DEFAULT_ISSUER};
use linktopics_types::SessionId;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "endpoint-test-secret";

/// Provider returning one canned summary (or a failure), counting calls.
pub struct FakeProvider {
    response: Option<CheckoutSummary>,
    calls: AtomicUsize,
    last_session: Mutex<Option<String>>,
}

impl FakeProvider {
    pub fn returning(summary: CheckoutSummary) -> Arc<Self> {
        Arc::new(Self {
            response: Some(summary),
            calls: AtomicUsize::new(0),
            last_session: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: AtomicUsize::new(0),
            last_session: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_session(&self) -> Option<String> {
        self.last_session.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    fn provider_name(&self) -> &'static str {
        "Fake"
    }

    async fn retrieve_session(&self, session_id: &SessionId) -> CheckoutResult<CheckoutSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_session.lock().unwrap() = Some(session_id.as_str().to_string());
        self.response.clone().ok_or(CheckoutError::RateLimited)
    }
}

/// A clock starting at the current time that advances one minute every
/// time it is read.
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            start: Utc::now(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::minutes(tick)
    }
}

pub fn test_state(provider: Arc<FakeProvider>) -> AppState {
    let signer = JwtLicenseIssuer::new(IssuerConfig::with_secret(TEST_SECRET))
        .unwrap()
        .with_clock(SteppingClock::new());
    AppState {
        provider,
        signer: Arc::new(signer),
    }
}

pub fn test_verifier() -> LicenseVerifier {
    LicenseVerifier::new(TEST_SECRET, DEFAULT_ISSUER)
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
pub async fn spawn_test_server(state: AppState) -> String {
    let app = build_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}
