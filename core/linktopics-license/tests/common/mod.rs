//! Shared test helpers for license tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use linktopics_license::{
    Clock, IssuerConfig, JwtLicenseIssuer, LicenseError, LicenseResult, VerifyApi,
};
use linktopics_types::{SessionId, VerifyEnvelope};
use std::sync::Mutex;

pub const TEST_SECRET: &str = "test-license-secret";

/// A fixed instant used as "now" in issuance tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// A clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An issuer with the default 400-day window and the test secret.
pub fn test_issuer() -> JwtLicenseIssuer {
    JwtLicenseIssuer::new(IssuerConfig::with_secret(TEST_SECRET)).unwrap()
}

/// A verify API returning a scripted response and recording session ids.
pub struct ScriptedApi {
    response: Mutex<Option<LicenseResult<VerifyEnvelope>>>,
    pub seen: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn ok(envelope: VerifyEnvelope) -> Self {
        Self {
            response: Mutex::new(Some(Ok(envelope))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn err(error: LicenseError) -> Self {
        Self {
            response: Mutex::new(Some(Err(error))),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl VerifyApi for ScriptedApi {
    async fn verify(&self, session_id: &SessionId) -> LicenseResult<VerifyEnvelope> {
        self.seen.lock().unwrap().push(session_id.to_string());
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(LicenseError::Network("no scripted response".to_string())))
    }
}
