//! GetMembershipStatusHandler - Query handler for the computed membership view.
//!
//! Read-only: the lazily derived status is returned, never written back.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{MemberId, TenantId, Timestamp};
use crate::domain::membership::{CurrentPlan, FreezeInterval, MembershipError, MembershipStatus};
use crate::ports::MemberRepository;

use super::support::load_member;

#[derive(Debug, Clone)]
pub struct GetMembershipStatusQuery {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    /// Defaults to now.
    pub at: Option<Timestamp>,
}

/// Snapshot of a membership as seen at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipView {
    pub member_id: MemberId,
    pub name: String,
    pub stored_status: MembershipStatus,
    pub effective_status: MembershipStatus,
    pub has_active_plan: bool,
    pub current_plan: Option<CurrentPlan>,
    pub days_remaining: Option<i64>,
    pub active_freeze: Option<FreezeInterval>,
    pub total_days_frozen: i64,
    pub freeze_count: usize,
    pub as_of: NaiveDate,
}

pub struct GetMembershipStatusHandler {
    members: Arc<dyn MemberRepository>,
}

impl GetMembershipStatusHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(
        &self,
        query: GetMembershipStatusQuery,
    ) -> Result<MembershipView, MembershipError> {
        let now = query.at.unwrap_or_else(Timestamp::now);
        let today = now.date_naive();

        let member = load_member(self.members.as_ref(), &query.tenant_id, &query.member_id).await?;
        let effective_status = member.effective_status(now);

        Ok(MembershipView {
            member_id: member.id,
            name: member.name.clone(),
            stored_status: member.status,
            effective_status,
            has_active_plan: effective_status.holds_plan(),
            days_remaining: member.days_remaining(today),
            active_freeze: member.active_freeze(now).cloned(),
            total_days_frozen: member.total_days_frozen(now),
            freeze_count: member.freeze_history.len(),
            current_plan: member.current_plan,
            as_of: today,
        })
    }
}
