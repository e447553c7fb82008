//! CancelMembershipHandler - Command handler for cancelling memberships.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MemberId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{Member, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository};

use super::support::{load_member, publish};

/// Command to cancel a membership.
#[derive(Debug, Clone)]
pub struct CancelMembershipCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub reason: Option<String>,
    pub actor: Option<StaffId>,
}

/// Result of successful membership cancellation.
#[derive(Debug, Clone)]
pub struct CancelMembershipResult {
    pub member: Member,
    pub event: MembershipEvent,
}

/// Handler for cancelling memberships.
///
/// Cancellation is a status change; the member record and its plan snapshot
/// stay in place. An open freeze is closed without credit.
pub struct CancelMembershipHandler {
    members: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelMembershipHandler {
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
        cmd: CancelMembershipCommand,
    ) -> Result<CancelMembershipResult, MembershipError> {
        let now = Timestamp::now();

        // 1. Find the member
        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;

        // 2. Cancel (domain logic)
        let previous_status = member.cancel(now, cmd.reason.clone()).map_err(|err| {
            tracing::warn!(member_id = %cmd.member_id, error = %err, "cancellation rejected");
            err
        })?;

        // 3. Persist the update
        self.members.save(&member).await?;

        // 4. Create and publish event
        let event = MembershipEvent::Cancelled {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            previous_status,
            reason: cmd.reason,
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::info!(member_id = %member.id, from = %previous_status, "membership cancelled");

        Ok(CancelMembershipResult { member, event })
    }
}
