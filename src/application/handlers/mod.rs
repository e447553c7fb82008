//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod membership;
pub mod revenue;

pub use membership::{
    CancelMembershipCommand, CancelMembershipHandler, CancelMembershipResult, ChangePlanCommand,
    ChangePlanHandler, ChangePlanResult, ConsumeSessionCommand, ConsumeSessionHandler,
    ConsumeSessionResult, DeleteMemberCommand, DeleteMemberHandler, EnrollMemberCommand,
    EnrollMemberHandler, EnrollMemberResult, FreezeMembershipCommand, FreezeMembershipHandler,
    FreezeMembershipResult, GetMembershipStatusHandler, GetMembershipStatusQuery, MembershipView,
    RenewMembershipCommand, RenewMembershipHandler, RenewMembershipResult,
    UnfreezeMembershipCommand, UnfreezeMembershipHandler, UnfreezeMembershipResult,
};
pub use revenue::{BuildRevenueRealizationHandler, BuildRevenueRealizationQuery};
