//! Payment session verification.

use async_trait::async_trait;
use linktopics_types::{LicensePlan, SessionId};
use tracing::debug;

use crate::error::CheckoutResult;
use crate::plan::resolve_plan;
use crate::session::CheckoutSummary;

/// A source of checkout sessions.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Returns the name of the payment provider.
    fn provider_name(&self) -> &'static str;

    /// Retrieves a session (with its subscription expanded) and adapts it
    /// into a [`CheckoutSummary`].
    async fn retrieve_session(&self, session_id: &SessionId) -> CheckoutResult<CheckoutSummary>;
}

/// Outcome of verifying a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// The adapted session record.
    pub session: CheckoutSummary,
    /// Whether the session entitles the customer to a license.
    pub active: bool,
}

impl Verification {
    /// Resolves the plan of the verified session.
    #[must_use]
    pub fn plan(&self) -> LicensePlan {
        resolve_plan(&self.session)
    }
}

/// Retrieves a session and decides whether it is active.
///
/// Performs exactly one provider call. Provider failures are returned as-is
/// and never retried.
pub async fn verify_session<P>(provider: &P, session_id: &SessionId) -> CheckoutResult<Verification>
where
    P: CheckoutProvider + ?Sized,
{
    debug!(
        "Verifying checkout session {} with {}",
        session_id,
        provider.provider_name()
    );

    let session = provider.retrieve_session(session_id).await?;
    let active = session.is_active();

    debug!(
        "Session {} paid={} mode={:?} subscription={:?} active={}",
        session_id, session.paid, session.mode, session.subscription_status, active
    );

    Ok(Verification { session, active })
}
