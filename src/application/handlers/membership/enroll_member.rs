//! EnrollMemberHandler - Command handler for putting a member on a plan.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{EventId, MemberId, PlanId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{CurrentPlan, Member, MembershipError, MembershipEvent};
use crate::ports::{EventPublisher, MemberRepository, PlanCatalog};

use super::support::{load_member, load_plan, publish};

/// Command to enroll a member on a plan.
#[derive(Debug, Clone)]
pub struct EnrollMemberCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub plan_id: PlanId,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    /// Passed through to invoicing on the enrolled event.
    pub discount_code: Option<String>,
    pub actor: Option<StaffId>,
}

/// Result of a successful enrollment.
#[derive(Debug, Clone)]
pub struct EnrollMemberResult {
    pub member: Member,
    pub current_plan: CurrentPlan,
    pub event: MembershipEvent,
}

/// Handler for enrollments.
///
/// The enrolled event carries plan, price and dates so the invoicing
/// collaborator can raise the invoice.
pub struct EnrollMemberHandler {
    members: Arc<dyn MemberRepository>,
    plans: Arc<dyn PlanCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EnrollMemberHandler {
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
        cmd: EnrollMemberCommand,
    ) -> Result<EnrollMemberResult, MembershipError> {
        let now = Timestamp::now();

        // 1. Load member and plan (same tenant)
        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;
        let plan = load_plan(self.plans.as_ref(), &cmd.tenant_id, &cmd.plan_id).await?;

        // 2. Domain transition
        let current_plan = member
            .enroll(&plan, cmd.start_date, now)
            .map_err(|err| {
                tracing::warn!(member_id = %cmd.member_id, error = %err, "enrollment rejected");
                err
            })?
            .clone();

        // 3. Persist
        self.members.save(&member).await?;

        // 4. Publish
        let event = MembershipEvent::Enrolled {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            plan_price: plan.price,
            start_date: current_plan.start_date,
            end_date: current_plan.end_date,
            discount_code: cmd.discount_code,
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::info!(
            member_id = %member.id,
            plan_id = %plan.id,
            start_date = %current_plan.start_date,
            "member enrolled"
        );

        Ok(EnrollMemberResult {
            member,
            current_plan,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::mocks::*;
    use crate::domain::membership::{MembershipStatus, Plan};

    fn handler(
        repo: Arc<MockMemberRepository>,
        plans: Vec<Plan>,
        publisher: Arc<MockEventPublisher>,
    ) -> EnrollMemberHandler {
        EnrollMemberHandler::new(repo, Arc::new(MockPlanCatalog::with_plans(plans)), publisher)
    }

    fn command(member: &Member, plan_id: PlanId) -> EnrollMemberCommand {
        EnrollMemberCommand {
            tenant_id: member.tenant_id.clone(),
            member_id: member.id,
            plan_id,
            start_date: None,
            discount_code: Some("SPRING10".to_string()),
            actor: Some(staff("desk")),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn enrolls_pending_member_from_today() {
        let member = pending_member();
        let plan = monthly_plan();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = handler(repo.clone(), vec![plan.clone()], publisher.clone());

        let result = handler.handle(command(&member, plan.id)).await.unwrap();

        assert_eq!(result.current_plan.start_date, today());
        assert_eq!(result.member.status, MembershipStatus::Active);
        let stored = repo.stored(&member.id).unwrap();
        assert_eq!(stored.current_plan.unwrap().plan_id, plan.id);
    }

    #[tokio::test]
    async fn publishes_enrolled_event_with_invoicing_data() {
        let member = pending_member();
        let plan = monthly_plan();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = handler(repo, vec![plan.clone()], publisher.clone());

        handler.handle(command(&member, plan.id)).await.unwrap();

        let events = publisher.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "membership.enrolled.v1");
        assert_eq!(events[0].metadata.tenant_id.as_deref(), Some("org-1"));
        assert_eq!(events[0].metadata.actor_id.as_deref(), Some("desk"));
        assert_eq!(events[0].payload["plan_price"], "1500");
        assert_eq!(events[0].payload["discount_code"], "SPRING10");
    }

    #[tokio::test]
    async fn explicit_start_date_is_used() {
        let member = pending_member();
        let plan = monthly_plan();
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let handler = handler(
            Arc::new(MockMemberRepository::with_member(member.clone())),
            vec![plan.clone()],
            Arc::new(MockEventPublisher::new()),
        );

        let mut cmd = command(&member, plan.id);
        cmd.start_date = Some(start);
        let result = handler.handle(cmd).await.unwrap();

        assert_eq!(
            result.current_plan.end_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let plan = monthly_plan();
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = handler(Arc::new(MockMemberRepository::new()), vec![plan.clone()], publisher.clone());

        let member = pending_member();
        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert_eq!(err, MembershipError::MemberNotFound(member.id));
        assert!(publisher.published_events().is_empty());
    }

    #[tokio::test]
    async fn plan_of_other_tenant_is_not_found() {
        let member = pending_member();
        let mut plan = monthly_plan();
        plan.tenant_id = other_tenant();
        let repo = Arc::new(MockMemberRepository::with_member(member.clone()));
        let handler = handler(repo.clone(), vec![plan.clone()], Arc::new(MockEventPublisher::new()));

        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert_eq!(err, MembershipError::PlanNotFound(plan.id));
        assert_eq!(repo.stored(&member.id).unwrap().status, MembershipStatus::Pending);
    }

    #[tokio::test]
    async fn save_failure_publishes_nothing() {
        let member = pending_member();
        let plan = monthly_plan();
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = handler(
            Arc::new(MockMemberRepository::failing_save(member.clone())),
            vec![plan.clone()],
            publisher.clone(),
        );

        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert!(matches!(err, MembershipError::Infrastructure(_)));
        assert!(publisher.published_events().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_is_reported() {
        let member = pending_member();
        let plan = monthly_plan();
        let handler = handler(
            Arc::new(MockMemberRepository::with_member(member.clone())),
            vec![plan.clone()],
            Arc::new(MockEventPublisher::failing()),
        );

        let err = handler.handle(command(&member, plan.id)).await.unwrap_err();

        assert!(err.is_retryable());
    }
}
