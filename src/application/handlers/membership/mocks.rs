//! Hand-written port doubles and fixtures for the membership handler tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventEnvelope, MemberId, Money, PlanId, StaffId, TenantId, Timestamp,
};
use crate::domain::membership::{Member, Plan, PlanDuration};
use crate::ports::{EventPublisher, MemberRepository, PlanCatalog};

// ════════════════════════════════════════════════════════════════════════════
// Mock Implementations
// ════════════════════════════════════════════════════════════════════════════

pub struct MockMemberRepository {
    members: Mutex<Vec<Member>>,
    fail_save: bool,
}

impl MockMemberRepository {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            fail_save: false,
        }
    }

    pub fn with_member(member: Member) -> Self {
        Self {
            members: Mutex::new(vec![member]),
            fail_save: false,
        }
    }

    pub fn failing_save(member: Member) -> Self {
        Self {
            members: Mutex::new(vec![member]),
            fail_save: true,
        }
    }

    pub fn stored(&self, id: &MemberId) -> Option<Member> {
        self.members.lock().unwrap().iter().find(|m| &m.id == id).cloned()
    }
}

#[async_trait]
impl MemberRepository for MockMemberRepository {
    async fn find_member(
        &self,
        tenant_id: &TenantId,
        member_id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let members = self.members.lock().unwrap();
        Ok(members
            .iter()
            .find(|m| &m.id == member_id && &m.tenant_id == tenant_id)
            .cloned())
    }

    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        if self.fail_save {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated save failure",
            ));
        }
        let mut members = self.members.lock().unwrap();
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }
        Ok(())
    }

    async fn delete(&self, tenant_id: &TenantId, member_id: &MemberId) -> Result<bool, DomainError> {
        let mut members = self.members.lock().unwrap();
        let before = members.len();
        members.retain(|m| !(&m.id == member_id && &m.tenant_id == tenant_id));
        Ok(members.len() != before)
    }
}

pub struct MockPlanCatalog {
    plans: Vec<Plan>,
}

impl MockPlanCatalog {
    pub fn with_plans(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl PlanCatalog for MockPlanCatalog {
    async fn find_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| &p.id == plan_id).cloned())
    }
}

pub struct MockEventPublisher {
    published_events: Mutex<Vec<EventEnvelope>>,
    fail_publish: bool,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            published_events: Mutex::new(Vec::new()),
            fail_publish: true,
        }
    }

    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published_events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publish {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Simulated publish failure",
            ));
        }
        self.published_events.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════

pub fn tenant() -> TenantId {
    TenantId::new("org-1").unwrap()
}

pub fn other_tenant() -> TenantId {
    TenantId::new("org-2").unwrap()
}

pub fn staff(name: &str) -> StaffId {
    StaffId::new(name).unwrap()
}

pub fn today() -> NaiveDate {
    Timestamp::now().date_naive()
}

pub fn monthly_plan() -> Plan {
    Plan::with_duration(
        PlanId::new(),
        tenant(),
        "Monthly",
        PlanDuration::months(1).unwrap(),
        None,
        Money::from_major(1500),
    )
    .unwrap()
}

pub fn class_pack(sessions: u32) -> Plan {
    Plan::session_pack(PlanId::new(), tenant(), "Class pack", sessions, Money::from_major(800))
        .unwrap()
}

pub fn pending_member() -> Member {
    Member::register(MemberId::new(), tenant(), "Ravi Menon", Timestamp::now()).unwrap()
}

/// Member enrolled on `plan` starting `start`.
pub fn member_on(plan: &Plan, start: NaiveDate) -> Member {
    let mut member = pending_member();
    member
        .enroll(plan, Some(start), Timestamp::start_of(start))
        .unwrap();
    member
}
