//! FreezeMembershipHandler - Command handler for suspending a membership.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MemberId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{FreezeInterval, Member, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository};

use super::support::{load_member, publish};

/// Command to freeze a membership.
#[derive(Debug, Clone)]
pub struct FreezeMembershipCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub start_date: Timestamp,
    /// Requested end; `None` for open-ended.
    pub end_date: Option<Timestamp>,
    pub reason: String,
    pub requested_by: StaffId,
}

#[derive(Debug, Clone)]
pub struct FreezeMembershipResult {
    pub member: Member,
    pub interval: FreezeInterval,
    pub event: MembershipEvent,
}

/// Handler for freezes.
///
/// The plan end date is not touched here; days are credited on unfreeze.
pub struct FreezeMembershipHandler {
    members: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl FreezeMembershipHandler {
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
        cmd: FreezeMembershipCommand,
    ) -> Result<FreezeMembershipResult, MembershipError> {
        let now = Timestamp::now();

        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;

        let interval = member
            .freeze(
                cmd.start_date,
                cmd.end_date,
                cmd.reason.clone(),
                cmd.requested_by.clone(),
                now,
            )
            .map_err(|err| {
                tracing::warn!(member_id = %cmd.member_id, error = %err, "freeze rejected");
                err
            })?
            .clone();

        self.members.save(&member).await?;

        let event = MembershipEvent::Frozen {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            freeze_start: interval.start_date,
            freeze_end: interval.end_date,
            reason: interval.reason.clone(),
            requested_by: interval.requested_by.clone(),
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, Some(&cmd.requested_by)).await?;

        tracing::info!(member_id = %member.id, "membership frozen");

        Ok(FreezeMembershipResult {
            member,
            interval,
            event,
        })
    }
}
