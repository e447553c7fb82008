//! PostgreSQL implementation of PlanCatalog.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::membership::Plan;
use crate::ports::PlanCatalog;

/// Reads plan documents from `plans`.
///
/// Documents are validated on load since they may be edited outside this
/// service.
pub struct PostgresPlanCatalog {
    pool: PgPool,
}

impl PostgresPlanCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces a plan document.
    pub async fn upsert(&self, plan: &Plan) -> Result<(), DomainError> {
        plan.validate()?;
        let document = serde_json::to_value(plan).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to serialize plan: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO plans (id, tenant_id, document)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET tenant_id = EXCLUDED.tenant_id, document = EXCLUDED.document
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(plan.tenant_id.as_str())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save plan: {}", e)))?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    document: JsonValue,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let plan: Plan = serde_json::from_value(row.document).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt plan document {}: {}", row.id, e),
            )
        })?;
        plan.validate()?;
        Ok(plan)
    }
}

#[async_trait]
impl PlanCatalog for PostgresPlanCatalog {
    async fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as("SELECT id, document FROM plans WHERE id = $1")
            .bind(plan_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find plan: {}", e)))?;

        row.map(Plan::try_from).transpose()
    }
}
