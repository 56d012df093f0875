//! Document status state machines.
//!
//! Bids, bid versions, and production plans each carry an enumerated
//! status backed by a PostgreSQL enum type. Transitions are validated
//! against explicit allow-tables so an invalid move (e.g. re-signing an
//! already-signed plan) is rejected by construction instead of relying
//! on callers to pass sensible strings.

use serde::{Deserialize, Serialize};

/// Lifecycle of a bid. Bids are never physically deleted; they only
/// move between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl BidStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: BidStatus) -> bool {
        use BidStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Sent, Accepted)
                | (Sent, Rejected)
                | (Sent, Expired)
                | (Expired, Sent)
                | (Rejected, Sent)
        )
    }
}

/// Lifecycle of a bid version. `Superseded` is terminal: once a newer
/// version exists the old snapshot is frozen apart from its notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bid_version_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Draft,
    Sent,
    Superseded,
}

impl VersionStatus {
    pub fn can_transition_to(self, next: VersionStatus) -> bool {
        use VersionStatus::*;
        matches!(
            (self, next),
            (Draft, Sent) | (Draft, Superseded) | (Sent, Superseded)
        )
    }
}

/// Lifecycle of a production plan. Signing is one-way: a signed plan
/// never transitions again, which keeps the signature audit fields
/// from being overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Sent,
    Signed,
}

impl PlanStatus {
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        use PlanStatus::*;
        matches!((self, next), (Draft, Sent) | (Sent, Signed) | (Draft, Signed))
    }
}
