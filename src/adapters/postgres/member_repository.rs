//! PostgreSQL implementation of MemberRepository.
//!
//! Each member is one JSONB document in `members`, keyed by
//! `(tenant_id, id)`. Saves are upserts; the last writer wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, TenantId};
use crate::domain::membership::Member;
use crate::ports::MemberRepository;

pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a member document.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    tenant_id: String,
    document: JsonValue,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let member: Member = serde_json::from_value(row.document).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt member document {}: {}", row.id, e),
            )
        })?;

        if member.id.as_uuid() != &row.id || member.tenant_id.as_str() != row.tenant_id {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Member document {} does not match its key", row.id),
            ));
        }

        Ok(member)
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn find_member(
        &self,
        tenant_id: &TenantId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, document, updated_at
            FROM members
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find member: {}", e)))?;

        row.map(Member::try_from).transpose()
    }

    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let document = serde_json::to_value(member).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize member: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO members (tenant_id, id, document, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tenant_id, id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(member.tenant_id.as_str())
        .bind(member.id.as_uuid())
        .bind(document)
        .bind(member.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save member: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, tenant_id: &TenantId, member_id: &MemberId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM members WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id.as_str())
            .bind(member_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
