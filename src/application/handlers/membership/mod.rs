//! Membership handlers.
//!
//! Command and query handlers for the membership lifecycle:
//!
//! ## Commands
//! - Enrolling and renewing on a plan
//! - Freezing and unfreezing
//! - Changing plan
//! - Cancelling
//! - Recording session check-ins
//! - Deleting a member
//!
//! ## Queries
//! - Computed membership status

mod cancel_membership;
mod change_plan;
mod consume_session;
mod delete_member;
mod enroll_member;
mod freeze_membership;
mod get_membership_status;
mod renew_membership;
mod support;
mod unfreeze_membership;

#[cfg(test)]
mod mocks;

// Commands
pub use cancel_membership::{CancelMembershipCommand, CancelMembershipHandler, CancelMembershipResult};
pub use change_plan::{ChangePlanCommand, ChangePlanHandler, ChangePlanResult};
pub use consume_session::{ConsumeSessionCommand, ConsumeSessionHandler, ConsumeSessionResult};
pub use delete_member::{DeleteMemberCommand, DeleteMemberHandler};
pub use enroll_member::{EnrollMemberCommand, EnrollMemberHandler, EnrollMemberResult};
pub use freeze_membership::{FreezeMembershipCommand, FreezeMembershipHandler, FreezeMembershipResult};
pub use renew_membership::{RenewMembershipCommand, RenewMembershipHandler, RenewMembershipResult};
pub use unfreeze_membership::{
    UnfreezeMembershipCommand, UnfreezeMembershipHandler, UnfreezeMembershipResult,
};

// Queries
pub use get_membership_status::{GetMembershipStatusHandler, GetMembershipStatusQuery, MembershipView};
