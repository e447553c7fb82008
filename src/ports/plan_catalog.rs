//! Plan catalog port - read access to plan reference data.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::membership::Plan;

/// Lookup of purchasable plans.
///
/// Plans are returned regardless of tenant; callers compare
/// `plan.tenant_id` with the member's tenant and treat a mismatch as
/// not found.
#[async_trait]
pub trait PlanCatalog: Send + Sync {
    /// Returns `None` if the plan does not exist.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on lookup failure
    /// - `ValidationFailed` if the stored plan is malformed
    async fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, DomainError>;
}
