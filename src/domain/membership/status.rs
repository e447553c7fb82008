//! Membership status state machine.
//!
//! `Expired` is never entered through a transition: it is derived at read
//! time from the plan end date (see `Member::effective_status`). It can still
//! appear as a stored value on legacy records, and renewal moves it back to
//! `Active`.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Stored membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Member registered but never enrolled on a plan.
    Pending,

    /// Plan in force; the member may attend.
    Active,

    /// Suspended by an open freeze interval.
    Frozen,

    /// Plan end date has passed.
    Expired,

    /// Explicitly cancelled by staff.
    Cancelled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Frozen => "frozen",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }

    /// True for statuses that still hold a running plan.
    pub fn holds_plan(&self) -> bool {
        matches!(self, MembershipStatus::Active | MembershipStatus::Frozen)
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            // Enroll / renew from anywhere
            (Pending, Active)
                | (Active, Active)
                | (Frozen, Active)
                | (Expired, Active)
                | (Cancelled, Active)
            // Freeze
                | (Active, Frozen)
            // Cancel
                | (Pending, Cancelled)
                | (Active, Cancelled)
                | (Frozen, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            Pending => vec![Active, Cancelled],
            Active => vec![Active, Frozen, Cancelled],
            Frozen => vec![Active, Cancelled],
            Expired => vec![Active],
            Cancelled => vec![Active],
        }
    }
}
