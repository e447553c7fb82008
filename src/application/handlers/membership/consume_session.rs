//! ConsumeSessionHandler - records one attendance against the session quota.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MemberId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipEvent, SessionCounter};
use crate::ports::{EventPublisher, MemberRepository};

use super::support::{load_member, publish};

#[derive(Debug, Clone)]
pub struct ConsumeSessionCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub actor: Option<StaffId>,
}

#[derive(Debug, Clone)]
pub struct ConsumeSessionResult {
    pub sessions: SessionCounter,
    pub event: MembershipEvent,
}

pub struct ConsumeSessionHandler {
    members: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ConsumeSessionHandler {
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
        cmd: ConsumeSessionCommand,
    ) -> Result<ConsumeSessionResult, MembershipError> {
        let now = Timestamp::now();

        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;

        let sessions = member.consume_session(now).map_err(|err| {
            tracing::warn!(member_id = %cmd.member_id, error = %err, "session check-in rejected");
            err
        })?;
        let plan_id = member
            .current_plan
            .as_ref()
            .map(|plan| plan.plan_id)
            .ok_or_else(|| MembershipError::infrastructure("session recorded without a plan"))?;

        self.members.save(&member).await?;

        let event = MembershipEvent::SessionConsumed {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            plan_id,
            used: sessions.used,
            remaining: sessions.remaining,
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::debug!(member_id = %member.id, used = sessions.used, "session consumed");

        Ok(ConsumeSessionResult { sessions, event })
    }
}
