//! Normalized billing cadence carried inside license tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The license plan, as written into the `plan` claim and the
/// verification response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicensePlan {
    /// Monthly subscription.
    #[serde(rename = "month")]
    Month,
    /// Yearly subscription.
    #[serde(rename = "year")]
    Year,
    /// One-time purchase.
    #[serde(rename = "oneoff")]
    OneOff,
}

impl LicensePlan {
    /// Returns the wire name of the plan.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
            Self::OneOff => "oneoff",
        }
    }

    /// Returns true if the plan is backed by a recurring subscription.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        matches!(self, Self::Month | Self::Year)
    }
}

impl fmt::Display for LicensePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicensePlan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "oneoff" => Ok(Self::OneOff),
            other => Err(Error::UnknownPlan(other.to_string())),
        }
    }
}
