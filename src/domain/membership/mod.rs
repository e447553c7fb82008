//! Membership lifecycle domain.
//!
//! Plans and their end-date arithmetic, the freeze ledger, the membership
//! status state machine and the `Member` aggregate that ties them together.

mod aggregate;
mod duration_calculator;
mod errors;
mod events;
mod freeze_ledger;
mod plan;
mod status;

pub use aggregate::{CurrentPlan, Member, ProrationMethod, SessionCounter, UnfreezeOutcome};
pub use duration_calculator::PlanDurationCalculator;
pub use errors::{ConflictKind, MembershipError};
pub use events::MembershipEvent;
pub use freeze_ledger::{FreezeInterval, FreezeLedger};
pub use plan::{DurationUnit, Plan, PlanDuration, PlanType};
pub use status::MembershipStatus;
