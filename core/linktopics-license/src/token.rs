//! License token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a secret held by the server:
//!
//! ```json
//! { "sub": "buyer@example.com", "plan": "year", "iss": "linktopics",
//!   "iat": 1760000000, "exp": 1794560000 }
//! ```
//!
//! `exp` is always `iat` plus the configured validity window (400 days).

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use linktopics_types::LicensePlan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Validity window of an issued license, in days.
pub const LICENSE_VALIDITY_DAYS: i64 = 400;

/// Issuer label written into the `iss` claim.
pub const DEFAULT_ISSUER: &str = "linktopics";

/// Subject used when the checkout session exposes no email.
pub const UNKNOWN_SUBJECT: &str = "unknown";

/// Source of the current time for issuance.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Configuration for license issuance.
#[derive(Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Value of the `iss` claim.
    pub issuer: String,
    /// Days between issuance and expiration.
    pub validity_days: i64,
}

impl IssuerConfig {
    /// Config with the default issuer and validity window.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: DEFAULT_ISSUER.to_string(),
            validity_days: LICENSE_VALIDITY_DAYS,
        }
    }
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("secret", &"[redacted]")
            .field("issuer", &self.issuer)
            .field("validity_days", &self.validity_days)
            .finish()
    }
}

/// Claims carried by a license token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    /// Customer email, or [`UNKNOWN_SUBJECT`].
    pub sub: String,
    /// Purchased plan.
    pub plan: LicensePlan,
    /// Issuer label.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl LicenseClaims {
    /// Returns the issuance time.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns true if the license has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly signed license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLicense {
    /// The compact JWT.
    pub token: String,
    /// The claims that were signed.
    pub claims: LicenseClaims,
}

/// Signs license tokens.
pub trait LicenseSigner: Send + Sync {
    /// Signs a token binding `subject` to `plan`.
    fn sign(&self, subject: &str, plan: LicensePlan) -> LicenseResult<IssuedLicense>;
}

/// HS256 JWT issuer.
#[derive(Clone)]
pub struct JwtLicenseIssuer {
    config: IssuerConfig,
    encoding_key: EncodingKey,
    clock: Arc<dyn Clock>,
}

impl JwtLicenseIssuer {
    /// Creates an issuer.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the validity window is
    /// not positive.
    pub fn new(config: IssuerConfig) -> LicenseResult<Self> {
        if config.secret.is_empty() {
            return Err(LicenseError::Config("missing license signing secret".to_string()));
        }
        if config.validity_days <= 0 {
            return Err(LicenseError::Config(format!(
                "validity must be positive, got {} days",
                config.validity_days
            )));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        Ok(Self {
            config,
            encoding_key,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock used for `iat`/`exp`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the issuer configuration.
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Signs a token as if issued at `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        plan: LicensePlan,
        now: DateTime<Utc>,
    ) -> LicenseResult<IssuedLicense> {
        let expires = now + Duration::days(self.config.validity_days);
        let claims = LicenseClaims {
            sub: subject.to_string(),
            plan,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| LicenseError::Signing(e.to_string()))?;

        debug!("Signed {} license expiring at {}", plan, expires);
        Ok(IssuedLicense { token, claims })
    }
}

impl LicenseSigner for JwtLicenseIssuer {
    fn sign(&self, subject: &str, plan: LicensePlan) -> LicenseResult<IssuedLicense> {
        self.issue_at(subject, plan, self.clock.now())
    }
}

/// Verifies license tokens offline.
#[derive(Clone)]
pub struct LicenseVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl LicenseVerifier {
    /// Creates a verifier for tokens signed with `secret` by `issuer`.
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Creates a verifier matching an issuer configuration.
    pub fn from_config(config: &IssuerConfig) -> Self {
        Self::new(&config.secret, &config.issuer)
    }

    /// Verifies the signature, issuer and expiration of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Expired`] for an expired token,
    /// [`LicenseError::InvalidSignature`] for a foreign or tampered one.
    pub fn verify(&self, token: &str) -> LicenseResult<LicenseClaims> {
        let token = token.trim();

        match decode::<LicenseClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => LicenseError::Expired(
                    self.expiry_of(token)
                        .unwrap_or_else(|| "unknown date".to_string()),
                ),
                ErrorKind::InvalidSignature => LicenseError::InvalidSignature,
                ErrorKind::InvalidIssuer => {
                    LicenseError::InvalidPayload("unexpected issuer".to_string())
                }
                ErrorKind::MissingRequiredClaim(claim) => {
                    LicenseError::InvalidPayload(format!("missing claim: {claim}"))
                }
                ErrorKind::Json(err) => LicenseError::InvalidPayload(err.to_string()),
                _ => LicenseError::InvalidTokenFormat(e.to_string()),
            }),
        }
    }

    /// Reads the expiration of an expired but otherwise valid token.
    fn expiry_of(&self, token: &str) -> Option<String> {
        let mut validation = self.validation.clone();
        validation.validate_exp = false;
        decode::<LicenseClaims>(token, &self.decoding_key, &validation)
            .ok()
            .and_then(|data| data.claims.expires_at())
            .map(|exp| exp.to_rfc3339())
    }
}
