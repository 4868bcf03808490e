//! Plan resolution from a verified session.

use linktopics_types::LicensePlan;

use crate::session::CheckoutSummary;

/// Derives the license plan from a session.
///
/// Subscriptions use the first line item's billing interval; anything other
/// than `year` (including a missing interval) is treated as monthly.
/// Sessions without a subscription are one-off purchases.
#[must_use]
pub fn resolve_plan(session: &CheckoutSummary) -> LicensePlan {
    if !session.has_subscription {
        return LicensePlan::OneOff;
    }

    match session.billing_interval.as_deref() {
        Some("year") => LicensePlan::Year,
        _ => LicensePlan::Month,
    }
}
