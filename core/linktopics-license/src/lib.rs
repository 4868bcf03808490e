//! Licensing and activation for LinkTopics Pro.
//!
//! This crate handles:
//! - Issuing signed, time-bounded license tokens after a verified purchase
//! - Offline verification of those tokens by any holder of the secret
//! - Client-side activation: picking up the checkout session from the
//!   return URL, exchanging it for a token, persisting it and notifying
//!   the companion extension
//!
//! # Design Principles
//!
//! - **Stateless issuance**: tokens are never stored server-side
//! - **Standard format**: HS256 JWTs, verifiable without contacting the issuer
//! - **Expiry only**: there is no revocation; a token lives 400 days
//! - **Single shot**: client activation runs once per page load, no retries
//!
//! # Token Claims
//!
//! - `sub`: customer email, or `"unknown"`
//! - `plan`: `month` / `year` / `oneoff`
//! - `iss`: `linktopics`
//! - `iat` / `exp`: issuance and expiration (seconds since epoch)

mod activation;
mod error;
mod storage;
mod token;

#[cfg(feature = "online")]
mod online;

pub use activation::{
    remove_query_param, session_id_from_url, ActivationHandler, ActivationListener,
    ActivationMessage, ActivationOutcome, ProState, VerifyApi, ACTIVATION_FAILED_MESSAGE,
    ACTIVATION_MESSAGE_TYPE, LICENSE_STORAGE_KEY, SESSION_ID_PARAM,
};
pub use error::{LicenseError, LicenseResult};
pub use storage::{FileLicenseStorage, LicenseStorage, MemoryLicenseStorage};
pub use token::{
    Clock, IssuedLicense, IssuerConfig, JwtLicenseIssuer, LicenseClaims, LicenseSigner,
    LicenseVerifier, SystemClock, DEFAULT_ISSUER, LICENSE_VALIDITY_DAYS, UNKNOWN_SUBJECT,
};

#[cfg(feature = "online")]
pub use online::HttpVerifyApi;
