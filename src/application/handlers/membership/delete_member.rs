//! DeleteMemberHandler - guarded removal of a member record.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MemberId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository};

use super::support::{load_member, publish};

#[derive(Debug, Clone)]
pub struct DeleteMemberCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub actor: Option<StaffId>,
}

/// Handler for member deletion.
///
/// Uses the computed status: a member whose plan lapsed is deletable even
/// if the stored status still says active.
pub struct DeleteMemberHandler {
    members: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteMemberHandler {
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
    pub async fn handle(&self, cmd: DeleteMemberCommand) -> Result<MembershipEvent, MembershipError> {
        let now = Timestamp::now();

        let member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;
        member.ensure_deletable(now).map_err(|err| {
            tracing::warn!(member_id = %cmd.member_id, error = %err, "deletion refused");
            err
        })?;

        if !self.members.delete(&cmd.tenant_id, &cmd.member_id).await? {
            return Err(MembershipError::member_not_found(cmd.member_id));
        }

        let event = MembershipEvent::MemberDeleted {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::info!(member_id = %member.id, "member deleted");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::mocks::*;
    use crate::domain::membership::{ConflictKind, Member};

    fn command(member: &Member) -> DeleteMemberCommand {
        DeleteMemberCommand {
            tenant_id: member.tenant_id.clone(),
            member_id: member.id,
            actor: None,
        }
    }

    #[tokio::test]
    async fn active_member_is_kept() {
        let member = member_on(&monthly_plan(), today());
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let handler = DeleteMemberHandler::new(repo.clone(), Arc::new(MockEventPublisher::new()));

        let err = handler.handle(command(&member)).await.unwrap_err();

        assert_eq!(err, MembershipError::Conflict(ConflictKind::HasActivePlan));
        assert!(repo.stored(&member.id).is_some());
    }

    #[tokio::test]
    async fn lapsed_member_with_stale_active_status_is_deleted() {
        let member = member_on(&monthly_plan(), today() - chrono::Duration::days(90));
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = DeleteMemberHandler::new(repo.clone(), publisher.clone());

        let event = handler.handle(command(&member)).await.unwrap();

        assert!(repo.stored(&member.id).is_none());
        assert_eq!(event.member_id(), &member.id);
        assert_eq!(
            publisher.published_events()[0].event_type,
            "membership.member_deleted.v1"
        );
    }

    #[tokio::test]
    async fn member_left_frozen_after_freeze_and_plan_ended_is_deleted() {
        let start = today() - chrono::Duration::days(400);
        let mut member = member_on(&monthly_plan(), start);
        let freeze_start = Timestamp::start_of(start + chrono::Duration::days(5));
        member
            .freeze(
                freeze_start,
                Some(freeze_start.add_days(7)),
                "travel",
                staff("desk"),
                freeze_start,
            )
            .unwrap();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let handler = DeleteMemberHandler::new(repo.clone(), Arc::new(MockEventPublisher::new()));

        handler.handle(command(&member)).await.unwrap();

        assert!(repo.stored(&member.id).is_none());
    }

    #[tokio::test]
    async fn pending_member_is_deleted() {
        let member = pending_member();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let handler = DeleteMemberHandler::new(repo.clone(), Arc::new(MockEventPublisher::new()));

        handler.handle(command(&member)).await.unwrap();

        assert!(repo.stored(&member.id).is_none());
    }
}
