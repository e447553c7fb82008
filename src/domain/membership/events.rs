//! Membership domain events.
//!
//! Emitted after each lifecycle change has been persisted. The enrolled and
//! renewed events carry everything the invoicing collaborator needs to raise
//! a financial document (plan, price, service dates, discount code).
//!
//! Events are named in past tense: `Frozen`, not `Freeze`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainEvent, EventId, MemberId, Money, PlanId, StaffId, TenantId, Timestamp,
};

use super::{MembershipStatus, ProrationMethod};

/// Events that occur during the membership lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// Member put on a plan.
    ///
    /// State transition: any → Active
    Enrolled {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        plan_id: PlanId,
        plan_name: String,
        plan_price: Money,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        discount_code: Option<String>,
        occurred_at: Timestamp,
    },

    /// Plan renewed, chaining from the previous end date unless told otherwise.
    ///
    /// State transition: any → Active
    Renewed {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        plan_id: PlanId,
        plan_name: String,
        plan_price: Money,
        previous_end_date: Option<NaiveDate>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        occurred_at: Timestamp,
    },

    /// State transition: Active → Frozen
    Frozen {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        freeze_start: Timestamp,
        freeze_end: Option<Timestamp>,
        reason: String,
        requested_by: StaffId,
        occurred_at: Timestamp,
    },

    /// Freeze lifted; `freeze_days` were credited to the plan end date.
    ///
    /// State transition: Frozen → Active
    Unfrozen {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        freeze_days: i64,
        new_end_date: Option<NaiveDate>,
        approved_by: Option<StaffId>,
        occurred_at: Timestamp,
    },

    /// Plan swapped in place. Dates and session counters are unchanged.
    PlanChanged {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        previous_plan_id: PlanId,
        new_plan_id: PlanId,
        new_plan_name: String,
        proration: ProrationMethod,
        occurred_at: Timestamp,
    },

    /// State transition: Pending/Active/Frozen → Cancelled
    Cancelled {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        previous_status: MembershipStatus,
        reason: Option<String>,
        occurred_at: Timestamp,
    },

    /// One attendance recorded against the plan's session quota.
    SessionConsumed {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        plan_id: PlanId,
        used: u32,
        remaining: Option<u32>,
        occurred_at: Timestamp,
    },

    /// Member record removed.
    MemberDeleted {
        event_id: EventId,
        member_id: MemberId,
        tenant_id: TenantId,
        occurred_at: Timestamp,
    },
}

impl MembershipEvent {
    pub fn member_id(&self) -> &MemberId {
        match self {
            MembershipEvent::Enrolled { member_id, .. }
            | MembershipEvent::Renewed { member_id, .. }
            | MembershipEvent::Frozen { member_id, .. }
            | MembershipEvent::Unfrozen { member_id, .. }
            | MembershipEvent::PlanChanged { member_id, .. }
            | MembershipEvent::Cancelled { member_id, .. }
            | MembershipEvent::SessionConsumed { member_id, .. }
            | MembershipEvent::MemberDeleted { member_id, .. } => member_id,
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        match self {
            MembershipEvent::Enrolled { tenant_id, .. }
            | MembershipEvent::Renewed { tenant_id, .. }
            | MembershipEvent::Frozen { tenant_id, .. }
            | MembershipEvent::Unfrozen { tenant_id, .. }
            | MembershipEvent::PlanChanged { tenant_id, .. }
            | MembershipEvent::Cancelled { tenant_id, .. }
            | MembershipEvent::SessionConsumed { tenant_id, .. }
            | MembershipEvent::MemberDeleted { tenant_id, .. } => tenant_id,
        }
    }
}

impl DomainEvent for MembershipEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MembershipEvent::Enrolled { .. } => "membership.enrolled.v1",
            MembershipEvent::Renewed { .. } => "membership.renewed.v1",
            MembershipEvent::Frozen { .. } => "membership.frozen.v1",
            MembershipEvent::Unfrozen { .. } => "membership.unfrozen.v1",
            MembershipEvent::PlanChanged { .. } => "membership.plan_changed.v1",
            MembershipEvent::Cancelled { .. } => "membership.cancelled.v1",
            MembershipEvent::SessionConsumed { .. } => "membership.session_consumed.v1",
            MembershipEvent::MemberDeleted { .. } => "membership.member_deleted.v1",
        }
    }

    fn aggregate_id(&self) -> String {
        self.member_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Member"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            MembershipEvent::Enrolled { occurred_at, .. }
            | MembershipEvent::Renewed { occurred_at, .. }
            | MembershipEvent::Frozen { occurred_at, .. }
            | MembershipEvent::Unfrozen { occurred_at, .. }
            | MembershipEvent::PlanChanged { occurred_at, .. }
            | MembershipEvent::Cancelled { occurred_at, .. }
            | MembershipEvent::SessionConsumed { occurred_at, .. }
            | MembershipEvent::MemberDeleted { occurred_at, .. } => *occurred_at,
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            MembershipEvent::Enrolled { event_id, .. }
            | MembershipEvent::Renewed { event_id, .. }
            | MembershipEvent::Frozen { event_id, .. }
            | MembershipEvent::Unfrozen { event_id, .. }
            | MembershipEvent::PlanChanged { event_id, .. }
            | MembershipEvent::Cancelled { event_id, .. }
            | MembershipEvent::SessionConsumed { event_id, .. }
            | MembershipEvent::MemberDeleted { event_id, .. } => event_id.clone(),
        }
    }
}
