//! Lookups and publishing shared by the membership handlers.

use crate::domain::foundation::{MemberId, PlanId, SerializableDomainEvent, StaffId, TenantId};
use crate::domain::membership::{Member, MembershipError, MembershipEvent, Plan};
use crate::ports::{EventPublisher, MemberRepository, PlanCatalog};

/// Loads a member of `tenant_id` or fails with `MemberNotFound`.
pub(super) async fn load_member(
    repository: &dyn MemberRepository,
    tenant_id: &TenantId,
    member_id: &MemberId,
) -> Result<Member, MembershipError> {
    repository
        .find_member(tenant_id, member_id)
        .await?
        .ok_or_else(|| MembershipError::member_not_found(*member_id))
}

/// Loads a plan sold by `tenant_id`.
///
/// A plan of another tenant is reported exactly like a missing one.
pub(super) async fn load_plan(
    catalog: &dyn PlanCatalog,
    tenant_id: &TenantId,
    plan_id: &PlanId,
) -> Result<Plan, MembershipError> {
    let plan = catalog
        .find_plan(plan_id)
        .await?
        .filter(|plan| &plan.tenant_id == tenant_id)
        .ok_or_else(|| MembershipError::plan_not_found(*plan_id))?;
    plan.validate()?;
    Ok(plan)
}

/// Wraps `event` in an envelope tagged with its tenant and publishes it.
pub(super) async fn publish(
    publisher: &dyn EventPublisher,
    event: &MembershipEvent,
    actor: Option<&StaffId>,
) -> Result<(), MembershipError> {
    let mut envelope = event
        .to_envelope()?
        .with_tenant_id(event.tenant_id().as_str());
    if let Some(actor) = actor {
        envelope = envelope.with_actor_id(actor.as_str());
    }
    publisher.publish(envelope).await?;
    Ok(())
}
