//! UnfreezeMembershipHandler - Command handler for lifting a freeze.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{EventId, MemberId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{Member, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository};

use super::support::{load_member, publish};

/// Command to unfreeze a membership at `now`.
#[derive(Debug, Clone)]
pub struct UnfreezeMembershipCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub now: Timestamp,
    pub approved_by: StaffId,
}

#[derive(Debug, Clone)]
pub struct UnfreezeMembershipResult {
    pub member: Member,
    /// Days added to the plan end date.
    pub freeze_days: i64,
    pub new_end_date: Option<NaiveDate>,
    pub event: MembershipEvent,
}

/// Handler for unfreezes.
///
/// A member marked frozen without an open interval is surfaced as a
/// conflict, never repaired here.
pub struct UnfreezeMembershipHandler {
    members: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UnfreezeMembershipHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            members,
            event_publisher,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(
        &self,
        cmd: UnfreezeMembershipCommand,
    ) -> Result<UnfreezeMembershipResult, MembershipError> {
        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;

        let outcome = member
            .unfreeze(cmd.now, cmd.approved_by.clone())
            .map_err(|err| {
                tracing::warn!(member_id = %cmd.member_id, error = %err, "unfreeze rejected");
                err
            })?;

        self.members.save(&member).await?;

        let event = MembershipEvent::Unfrozen {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            freeze_days: outcome.freeze_days,
            new_end_date: outcome.new_end_date,
            approved_by: Some(cmd.approved_by.clone()),
            occurred_at: cmd.now,
        };
        publish(self.event_publisher.as_ref(), &event, Some(&cmd.approved_by)).await?;

        tracing::info!(
            member_id = %member.id,
            freeze_days = outcome.freeze_days,
            "membership unfrozen"
        );

        Ok(UnfreezeMembershipResult {
            member,
            freeze_days: outcome.freeze_days,
            new_end_date: outcome.new_end_date,
            event,
        })
    }
}
