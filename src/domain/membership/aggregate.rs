//! Member aggregate and the membership lifecycle.
//!
//! A member holds at most one plan snapshot (`current_plan`) which is
//! replaced wholesale on enroll and renew. The stored `status` is only moved
//! by explicit transitions (enroll, renew, freeze, unfreeze, cancel); expiry
//! is never stored, it is read through [`Member::effective_status`].
//!
//! # Design Decisions
//!
//! - **Lazy expiry**: reads compare `current_plan.end_date` with today and
//!   never write the result back.
//! - **Credit on unfreeze**: freezing leaves the end date alone; unfreezing
//!   pushes it out by the days actually spent frozen.
//! - **Plan swap without proration**: `change_plan` only swaps the plan
//!   reference. The proration method is recorded but no amounts or dates
//!   are recomputed.
//! - **Caller-supplied clock**: every operation takes `now`/`today`, so the
//!   aggregate never reads the system clock.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    MemberId, PlanId, StaffId, StateMachine, TenantId, Timestamp, ValidationError,
};

use super::{
    ConflictKind, FreezeInterval, FreezeLedger, MembershipError, MembershipStatus, Plan,
    PlanDurationCalculator,
};

/// Session quota tracking for the current plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounter {
    /// Quota granted by the plan; `None` for unlimited plans.
    pub total: Option<u32>,
    pub used: u32,
    pub remaining: Option<u32>,
}

impl SessionCounter {
    /// Fresh counter for a plan quota.
    pub fn fresh(quota: Option<u32>) -> Self {
        Self {
            total: quota,
            used: 0,
            remaining: quota,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.total.is_none()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn record_use(&mut self) -> Result<(), MembershipError> {
        if self.is_exhausted() {
            return Err(MembershipError::conflict(ConflictKind::SessionsExhausted));
        }
        match self.remaining {
            Some(left) => {
                self.remaining = Some(left - 1);
                self.used = self.used.saturating_add(1);
                Ok(())
            }
            None => {
                self.used = self.used.saturating_add(1);
                Ok(())
            }
        }
    }
}

/// Snapshot of the plan a member is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPlan {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub start_date: NaiveDate,

    /// Last usable day; `None` for session packs.
    pub end_date: Option<NaiveDate>,

    pub sessions: SessionCounter,
}

impl CurrentPlan {
    /// Builds a fresh snapshot of `plan` starting on `start_date`.
    pub fn snapshot(plan: &Plan, start_date: NaiveDate) -> Self {
        Self {
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            start_date,
            end_date: PlanDurationCalculator::compute_end_date(start_date, plan),
            sessions: SessionCounter::fresh(plan.sessions),
        }
    }

    /// True once `today` is past the last usable day.
    pub fn has_lapsed(&self, today: NaiveDate) -> bool {
        matches!(self.end_date, Some(end) if today > end)
    }
}

/// How a plan change should be priced.
///
/// Accepted and recorded on the plan-changed event, but not applied: no
/// amount or date is recomputed for any method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationMethod {
    #[default]
    None,
    Prorate,
    FullCredit,
}

/// Result of lifting a freeze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfreezeOutcome {
    /// The interval as closed.
    pub interval: FreezeInterval,

    /// Days credited to the plan end date.
    pub freeze_days: i64,

    pub new_end_date: Option<NaiveDate>,
}

/// Member aggregate.
///
/// # Invariants
///
/// - At most one freeze interval is open at any instant
/// - `current_plan` is `None` only while the member has never been enrolled
/// - Stored status is never `Expired` as the result of an operation here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Organization the member belongs to.
    pub tenant_id: TenantId,

    pub name: String,

    /// Stored status; read through `effective_status` for decisions.
    pub status: MembershipStatus,

    pub current_plan: Option<CurrentPlan>,

    #[serde(default)]
    pub freeze_history: FreezeLedger,

    pub cancelled_at: Option<Timestamp>,

    pub cancellation_reason: Option<String>,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl Member {
    /// Registers a member with no plan yet.
    pub fn register(
        id: MemberId,
        tenant_id: TenantId,
        name: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id,
            tenant_id,
            name,
            status: MembershipStatus::Pending,
            current_plan: None,
            freeze_history: FreezeLedger::new(),
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Read side
    // ════════════════════════════════════════════════════════════════════════

    /// Status as seen at `now`.
    ///
    /// A stored `Active` whose plan ended before today reads as `Expired`.
    /// So does a stored `Frozen` once its plan has ended and no freeze
    /// interval is still open. Every other stored status is reported as is.
    pub fn effective_status(&self, now: Timestamp) -> MembershipStatus {
        let today = now.date_naive();
        match (&self.status, &self.current_plan) {
            (MembershipStatus::Active, Some(plan)) if plan.has_lapsed(today) => {
                MembershipStatus::Expired
            }
            (MembershipStatus::Frozen, Some(plan))
                if plan.has_lapsed(today) && self.active_freeze(now).is_none() =>
            {
                MembershipStatus::Expired
            }
            (status, _) => *status,
        }
    }

    /// True while the member is active or frozen at `now`.
    pub fn has_active_plan(&self, now: Timestamp) -> bool {
        self.effective_status(now).holds_plan()
    }

    /// Whole days left on the plan, counting `today`. `None` without an end date.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        let end = self.current_plan.as_ref()?.end_date?;
        Some(((end - today).num_days() + 1).max(0))
    }

    pub fn active_freeze(&self, now: Timestamp) -> Option<&FreezeInterval> {
        self.freeze_history.find_active_freeze(now)
    }

    pub fn total_days_frozen(&self, now: Timestamp) -> i64 {
        self.freeze_history.total_days_frozen(now)
    }

    /// Refuses deletion while a plan is running.
    ///
    /// # Errors
    ///
    /// `Conflict(HasActivePlan)` when the effective status is active or frozen.
    pub fn ensure_deletable(&self, now: Timestamp) -> Result<(), MembershipError> {
        if self.has_active_plan(now) {
            return Err(MembershipError::conflict(ConflictKind::HasActivePlan));
        }
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════

    /// Puts the member on `plan`, starting `start_date` or today.
    ///
    /// Any open freeze is closed at `now` without credit.
    ///
    /// # Errors
    ///
    /// `PlanNotFound` when the plan belongs to another tenant.
    pub fn enroll(
        &mut self,
        plan: &Plan,
        start_date: Option<NaiveDate>,
        now: Timestamp,
    ) -> Result<&CurrentPlan, MembershipError> {
        self.ensure_same_tenant(plan)?;
        let start_date = start_date.unwrap_or_else(|| now.date_naive());
        self.activate_with(plan, start_date, now, "enroll")
    }

    /// Renews onto `plan`.
    ///
    /// Without an explicit `start_date` the new period starts on the previous
    /// end date, even when that date is already in the past.
    ///
    /// Returns the previous end date.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` when the plan belongs to another tenant
    /// - `InvalidState` when no start date is given and there is no previous
    ///   end date to chain from
    pub fn renew(
        &mut self,
        plan: &Plan,
        start_date: Option<NaiveDate>,
        now: Timestamp,
    ) -> Result<Option<NaiveDate>, MembershipError> {
        self.ensure_same_tenant(plan)?;
        let previous_end = self.current_plan.as_ref().and_then(|p| p.end_date);

        let start_date = match start_date.or(previous_end) {
            Some(date) => date,
            None => {
                return Err(MembershipError::invalid_state(
                    self.describe_plan_state(),
                    "renew without a start date",
                ))
            }
        };

        self.activate_with(plan, start_date, now, "renew")?;
        Ok(previous_end)
    }

    /// Opens a freeze interval and marks the membership frozen.
    ///
    /// The plan end date is left unchanged until unfreeze.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for a blank reason or `end_date <= start_date`
    /// - `Conflict(AlreadyFrozen)` when a freeze is already open
    /// - `Conflict(NotActive)` when the membership is not active on `now`
    pub fn freeze(
        &mut self,
        start_date: Timestamp,
        end_date: Option<Timestamp>,
        reason: impl Into<String>,
        requested_by: StaffId,
        now: Timestamp,
    ) -> Result<&FreezeInterval, MembershipError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reason").into());
        }
        if let Some(end) = end_date {
            if !end.is_after(&start_date) {
                return Err(MembershipError::validation(
                    "end_date",
                    "freeze end must be after its start",
                ));
            }
        }
        if self.freeze_history.find_active_freeze(now).is_some() {
            return Err(MembershipError::already_frozen());
        }
        if self.effective_status(now) != MembershipStatus::Active {
            return Err(MembershipError::conflict(ConflictKind::NotActive));
        }

        self.transition(MembershipStatus::Frozen, "freeze")?;
        self.updated_at = now;
        self.freeze_history
            .add_freeze(start_date, end_date, reason, requested_by, now)
    }

    /// Lifts the open freeze and credits the elapsed days to the end date.
    ///
    /// # Errors
    ///
    /// - `InvalidState` when the membership is not frozen
    /// - `Conflict(NoActiveFreeze)` when frozen but no interval is open
    pub fn unfreeze(
        &mut self,
        now: Timestamp,
        approved_by: StaffId,
    ) -> Result<UnfreezeOutcome, MembershipError> {
        if self.status != MembershipStatus::Frozen {
            return Err(MembershipError::invalid_state(self.status.as_str(), "unfreeze"));
        }

        let freeze_days = match self.freeze_history.find_active_freeze(now) {
            Some(interval) => FreezeLedger::total_freeze_days(interval, now),
            None => return Err(MembershipError::conflict(ConflictKind::NoActiveFreeze)),
        };

        let new_end_date = match self.current_plan.as_mut() {
            Some(plan) => {
                if let Some(end) = plan.end_date {
                    plan.end_date = Some(extend_by_days(end, freeze_days)?);
                }
                plan.end_date
            }
            None => None,
        };

        let interval = self
            .freeze_history
            .close_active_freeze(now, Some(approved_by))
            .ok_or_else(|| MembershipError::conflict(ConflictKind::NoActiveFreeze))?;

        self.transition(MembershipStatus::Active, "unfreeze")?;
        self.updated_at = now;

        Ok(UnfreezeOutcome {
            interval,
            freeze_days,
            new_end_date,
        })
    }

    /// Swaps the current plan reference to `new_plan`.
    ///
    /// Dates and session counters are untouched and `proration` is not
    /// applied. Returns the previous plan id.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` when the plan belongs to another tenant
    /// - `InvalidState` when the member has no plan to change
    pub fn change_plan(
        &mut self,
        new_plan: &Plan,
        _proration: ProrationMethod,
        now: Timestamp,
    ) -> Result<PlanId, MembershipError> {
        self.ensure_same_tenant(new_plan)?;
        let state = self.describe_plan_state();
        let current = self
            .current_plan
            .as_mut()
            .ok_or_else(|| MembershipError::invalid_state(state, "change plan"))?;

        let previous = current.plan_id;
        current.plan_id = new_plan.id;
        current.plan_name = new_plan.name.clone();
        self.updated_at = now;
        Ok(previous)
    }

    /// Cancels the membership.
    ///
    /// An open freeze is closed at `now` without crediting days. Returns the
    /// status before cancellation.
    ///
    /// # Errors
    ///
    /// `InvalidState` when already cancelled or stored as expired.
    pub fn cancel(
        &mut self,
        now: Timestamp,
        reason: Option<String>,
    ) -> Result<MembershipStatus, MembershipError> {
        let previous = self.status;
        self.transition(MembershipStatus::Cancelled, "cancel")?;
        self.freeze_history.close_active_freeze(now, None);
        self.cancelled_at = Some(now);
        self.cancellation_reason = reason;
        self.updated_at = now;
        Ok(previous)
    }

    /// Records one attendance against the session quota.
    ///
    /// Unlimited plans count the visit without a quota check.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the membership is active on `now`
    /// - `Conflict(SessionsExhausted)` when no sessions are left
    pub fn consume_session(&mut self, now: Timestamp) -> Result<SessionCounter, MembershipError> {
        let effective = self.effective_status(now);
        if effective != MembershipStatus::Active {
            return Err(MembershipError::invalid_state(effective.as_str(), "consume session"));
        }

        let plan = self
            .current_plan
            .as_mut()
            .ok_or_else(|| MembershipError::invalid_state("no plan", "consume session"))?;
        plan.sessions.record_use()?;
        let counter = plan.sessions;
        self.updated_at = now;
        Ok(counter)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════════════════════════════════

    fn activate_with(
        &mut self,
        plan: &Plan,
        start_date: NaiveDate,
        now: Timestamp,
        operation: &str,
    ) -> Result<&CurrentPlan, MembershipError> {
        self.transition(MembershipStatus::Active, operation)?;
        self.freeze_history.close_active_freeze(now, None);
        self.cancelled_at = None;
        self.cancellation_reason = None;
        self.updated_at = now;
        Ok(&*self
            .current_plan
            .insert(CurrentPlan::snapshot(plan, start_date)))
    }

    fn ensure_same_tenant(&self, plan: &Plan) -> Result<(), MembershipError> {
        if plan.tenant_id != self.tenant_id {
            return Err(MembershipError::plan_not_found(plan.id));
        }
        Ok(())
    }

    fn describe_plan_state(&self) -> String {
        match &self.current_plan {
            None => format!("{} without a plan", self.status),
            Some(plan) if plan.end_date.is_none() => {
                format!("{} on a session plan", self.status)
            }
            Some(_) => self.status.to_string(),
        }
    }

    fn transition(
        &mut self,
        target: MembershipStatus,
        operation: &str,
    ) -> Result<(), MembershipError> {
        let current = self.status;
        self.status = current
            .transition_to(target)
            .map_err(|_| MembershipError::invalid_state(current.as_str(), operation))?;
        Ok(())
    }
}

fn extend_by_days(date: NaiveDate, days: i64) -> Result<NaiveDate, MembershipError> {
    u64::try_from(days)
        .ok()
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or_else(|| MembershipError::validation("end_date", "extension out of range"))
}
