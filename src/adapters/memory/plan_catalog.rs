//! In-memory plan catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::membership::Plan;
use crate::ports::PlanCatalog;

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanCatalog {
    plans: Arc<RwLock<HashMap<PlanId, Plan>>>,
}

impl InMemoryPlanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a plan.
    pub async fn insert(&self, plan: Plan) {
        self.plans.write().await.insert(plan.id, plan);
    }
}

#[async_trait]
impl PlanCatalog for InMemoryPlanCatalog {
    async fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.read().await.get(plan_id).cloned())
    }
}
