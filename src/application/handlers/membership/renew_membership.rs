//! RenewMembershipHandler - Command handler for renewals.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{EventId, MemberId, PlanId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{CurrentPlan, Member, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository, PlanCatalog};

use super::support::{load_member, load_plan, publish};

/// Command to renew a membership.
#[derive(Debug, Clone)]
pub struct RenewMembershipCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub plan_id: PlanId,
    /// Defaults to the previous plan's end date, even if that is in the past.
    pub start_date: Option<NaiveDate>,
    pub actor: Option<StaffId>,
}

#[derive(Debug, Clone)]
pub struct RenewMembershipResult {
    pub member: Member,
    pub current_plan: CurrentPlan,
    pub previous_end_date: Option<NaiveDate>,
    pub event: MembershipEvent,
}

pub struct RenewMembershipHandler {
    members: Arc<dyn MemberRepository>,
    plans: Arc<dyn PlanCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RenewMembershipHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        plans: Arc<dyn PlanCatalog>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            members,
            plans,
            event_publisher,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(
        &self,
        cmd: RenewMembershipCommand,
    ) -> Result<RenewMembershipResult, MembershipError> {
        let now = Timestamp::now();

        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;
        let plan = load_plan(self.plans.as_ref(), &cmd.tenant_id, &cmd.plan_id).await?;

        let previous_end_date = member.renew(&plan, cmd.start_date, now).map_err(|err| {
            tracing::warn!(member_id = %cmd.member_id, error = %err, "renewal rejected");
            err
        })?;
        let current_plan = member
            .current_plan
            .clone()
            .ok_or_else(|| MembershipError::infrastructure("renewal left no current plan"))?;

        if let Some(previous) = previous_end_date {
            if cmd.start_date.is_none() && previous < now.date_naive() {
                tracing::warn!(
                    member_id = %member.id,
                    anchored_at = %previous,
                    "renewal chained from an end date in the past"
                );
            }
        }

        self.members.save(&member).await?;

        let event = MembershipEvent::Renewed {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            plan_price: plan.price,
            previous_end_date,
            start_date: current_plan.start_date,
            end_date: current_plan.end_date,
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::info!(
            member_id = %member.id,
            plan_id = %plan.id,
            start_date = %current_plan.start_date,
            "membership renewed"
        );

        Ok(RenewMembershipResult {
            member,
            current_plan,
            previous_end_date,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::mocks::*;
    use crate::domain::membership::MembershipStatus;

    fn command(member: &Member, plan_id: PlanId) -> RenewMembershipCommand {
        RenewMembershipCommand {
            tenant_id: member.tenant_id.clone(),
            member_id: member.id,
            plan_id,
            start_date: None,
            actor: None,
        }
    }

    #[tokio::test]
    async fn renewal_chains_from_stale_end_date() {
        let plan = monthly_plan();
        let start = today() - chrono::Duration::days(40);
        let member = member_on(&plan, start);
        let old_end = member.current_plan.as_ref().unwrap().end_date.unwrap();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = RenewMembershipHandler::new(
            repo.clone(),
            Arc::new(MockPlanCatalog::with_plans(vec![plan.clone()])),
            publisher.clone(),
        );

        let result = handler.handle(command(&member, plan.id)).await.unwrap();

        assert_eq!(result.previous_end_date, Some(old_end));
        assert_eq!(result.current_plan.start_date, old_end);
        assert!(old_end < today());
        assert_eq!(repo.stored(&member.id).unwrap().status, MembershipStatus::Active);
        assert_eq!(publisher.published_events()[0].event_type, "membership.renewed.v1");
    }

    #[tokio::test]
    async fn renewing_pending_member_without_start_is_invalid_state() {
        let member = pending_member();
        let plan = monthly_plan();
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = RenewMembershipHandler::new(
            Arc::new(MockMemberRepository::with_member(member.clone())),
            Arc::new(MockPlanCatalog::with_plans(vec![plan.clone()])),
            publisher.clone(),
        );

        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert!(matches!(err, MembershipError::InvalidState { .. }));
        assert!(publisher.published_events().is_empty());
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let plan = monthly_plan();
        let member = member_on(&plan, today());
        let handler = RenewMembershipHandler::new(
            Arc::new(MockMemberRepository::with_member(member.clone())),
            Arc::new(MockPlanCatalog::with_plans(vec![])),
            Arc::new(MockEventPublisher::new()),
        );

        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert_eq!(err, MembershipError::PlanNotFound(plan.id));
    }
}
