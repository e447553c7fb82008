//! In-memory member store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberId, TenantId};
use crate::domain::membership::Member;
use crate::ports::MemberRepository;

/// Member documents keyed by tenant and id. Saves overwrite.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    members: Arc<RwLock<HashMap<(TenantId, MemberId), Member>>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored members across all tenants.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.members.write().await.clear();
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberStore {
    async fn find_member(
        &self,
        tenant_id: &TenantId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let members = self.members.read().await;
        Ok(members.get(&(tenant_id.clone(), *member_id)).cloned())
    }

    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let mut members = self.members.write().await;
        members.insert((member.tenant_id.clone(), member.id), member.clone());
        Ok(())
    }

    async fn delete(&self, tenant_id: &TenantId, member_id: &MemberId) -> Result<bool, DomainError> {
        let mut members = self.members.write().await;
        Ok(members.remove(&(tenant_id.clone(), *member_id)).is_some())
    }
}
