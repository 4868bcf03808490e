//! Checkout session verification for LinkTopics Pro.
//!
//! This crate answers one question: does a payment-provider checkout
//! session entitle its customer to a license, and on which plan?
//!
//! - [`CheckoutProvider`] retrieves a session and adapts it into the narrow
//!   [`CheckoutSummary`] shape; [`StripeClient`] is the production provider
//! - [`verify_session`] computes whether the session is active
//! - [`resolve_plan`] derives the normalized [`LicensePlan`](linktopics_types::LicensePlan)
//!
//! # Activity rule
//!
//! A session is active when its expanded subscription has status `active`,
//! or when it is a one-off (`payment` mode) checkout that has been paid.
//! Everything else, including trials and incomplete subscriptions, is
//! inactive.

mod error;
mod plan;
mod session;
mod stripe;
mod verifier;

pub use error::{CheckoutError, CheckoutResult};
pub use plan::resolve_plan;
pub use session::{CheckoutMode, CheckoutSummary};
pub use stripe::{StripeClient, StripeConfig};
pub use verifier::{verify_session, CheckoutProvider, Verification};
