//! ChangePlanHandler - upgrade or downgrade of the current plan.
//!
//! Only the plan reference changes. The proration method is accepted and
//! published on the event but no price or date is recomputed; there is no
//! agreed proration rule yet.

use std::sync::Arc;

use crate::domain::foundation::{EventId, MemberId, PlanId, StaffId, TenantId, Timestamp};
use crate::domain::membership::{Member, MembershipError, MembershipEvent, ProrationMethod};
use crate::ports::{EventPublisher, MemberRepository, PlanCatalog};

use super::support::{load_member, load_plan, publish};

#[derive(Debug, Clone)]
pub struct ChangePlanCommand {
    pub tenant_id: TenantId,
    pub member_id: MemberId,
    pub new_plan_id: PlanId,
    pub proration: ProrationMethod,
    pub actor: Option<StaffId>,
}

#[derive(Debug, Clone)]
pub struct ChangePlanResult {
    pub member: Member,
    pub previous_plan_id: PlanId,
    pub event: MembershipEvent,
}

pub struct ChangePlanHandler {
    members: Arc<dyn MemberRepository>,
    plans: Arc<dyn PlanCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChangePlanHandler {
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
    pub async fn handle(&self, cmd: ChangePlanCommand) -> Result<ChangePlanResult, MembershipError> {
        let now = Timestamp::now();

        let mut member = load_member(self.members.as_ref(), &cmd.tenant_id, &cmd.member_id).await?;
        let plan = load_plan(self.plans.as_ref(), &cmd.tenant_id, &cmd.new_plan_id).await?;

        let previous_plan_id = member
            .change_plan(&plan, cmd.proration, now)
            .map_err(|err| {
                tracing::warn!(member_id = %cmd.member_id, error = %err, "plan change rejected");
                err
            })?;

        self.members.save(&member).await?;

        let event = MembershipEvent::PlanChanged {
            event_id: EventId::new(),
            member_id: member.id,
            tenant_id: member.tenant_id.clone(),
            previous_plan_id,
            new_plan_id: plan.id,
            new_plan_name: plan.name.clone(),
            proration: cmd.proration,
            occurred_at: now,
        };
        publish(self.event_publisher.as_ref(), &event, cmd.actor.as_ref()).await?;

        tracing::info!(
            member_id = %member.id,
            from = %previous_plan_id,
            to = %plan.id,
            proration = ?cmd.proration,
            "plan changed without proration"
        );

        Ok(ChangePlanResult {
            member,
            previous_plan_id,
            event,
        })
    }
}
