//! Subscription snapshot as reported by the backend
//!
//! Advisory display data only: the backend enforces quotas, the client just
//! shows them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of analyses included in the free tier
pub const FREE_TIER_LIMIT: u32 = 3;

/// Billing plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Paid tier, unlimited analyses
    Pro,
    /// Free tier with a monthly analysis limit; also used for unknown plans
    #[default]
    #[serde(other)]
    Free,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

const fn default_limit() -> u32 {
    FREE_TIER_LIMIT
}

/// Plan and usage counters for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Current plan
    #[serde(default)]
    pub plan: Plan,
    /// Analyses consumed this period
    #[serde(default)]
    pub analyses_used: u32,
    /// Analyses allowed this period; ignored for [`Plan::Pro`]
    #[serde(default = "default_limit")]
    pub analyses_limit: u32,
}

impl Default for Subscription {
    /// The snapshot shown whenever the real one cannot be fetched.
    fn default() -> Self {
        Self {
            plan: Plan::Free,
            analyses_used: 0,
            analyses_limit: FREE_TIER_LIMIT,
        }
    }
}

impl Subscription {
    /// Free-plan snapshot with the given counters
    #[must_use]
    pub const fn free(analyses_used: u32, analyses_limit: u32) -> Self {
        Self {
            plan: Plan::Free,
            analyses_used,
            analyses_limit,
        }
    }

    /// Pro-plan snapshot
    #[must_use]
    pub const fn pro() -> Self {
        Self {
            plan: Plan::Pro,
            analyses_used: 0,
            analyses_limit: FREE_TIER_LIMIT,
        }
    }

    /// Whether the user is on the paid plan
    #[must_use]
    pub const fn is_pro(&self) -> bool {
        matches!(self.plan, Plan::Pro)
    }

    /// Usage line shown on the dashboard header for free users,
    /// e.g. `"2/3 analyses used"`. `None` for pro users.
    #[must_use]
    pub fn usage_line(&self) -> Option<String> {
        if self.is_pro() {
            None
        } else {
            Some(format!(
                "{}/{} analyses used",
                self.analyses_used, self.analyses_limit
            ))
        }
    }
}
