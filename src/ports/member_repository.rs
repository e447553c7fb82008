//! Member repository port.
//!
//! Members are stored as whole documents, one per member, scoped by tenant.
//!
//! # Concurrency
//!
//! `save` is last-write-wins. Two concurrent mutations of the same member
//! (e.g. two freeze requests) both load the same document and the later save
//! overwrites the earlier one. Adapters may strengthen this with a
//! conditional write but callers do not rely on it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::membership::Member;

/// Repository port for `Member` aggregates.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member within a tenant.
    ///
    /// Returns `None` if the member does not exist or belongs to another
    /// tenant.
    async fn find_member(
        &self,
        tenant_id: &TenantId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError>;

    /// Insert or replace the member document.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, member: &Member) -> Result<(), DomainError>;

    /// Remove a member document.
    ///
    /// Returns `false` if nothing was deleted.
    async fn delete(&self, tenant_id: &TenantId, member_id: &MemberId) -> Result<bool, DomainError>;
}
