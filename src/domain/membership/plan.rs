//! Membership plan reference data.
//!
//! Plans are validated when they are built or loaded, so every plan that
//! reaches the lifecycle code has a usable duration or session quota.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PlanId, TenantId, ValidationError};

/// How a plan limits the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Time-boxed plan with a computed end date.
    Duration,
    /// Session pack; never expires by date.
    Sessions,
}

/// Calendar unit of a plan duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
            DurationUnit::Years => "years",
        }
    }
}

/// A positive amount of a calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

impl PlanDuration {
    /// Creates a duration, rejecting zero.
    pub fn new(value: u32, unit: DurationUnit) -> Result<Self, ValidationError> {
        let duration = Self { value, unit };
        duration.validate()?;
        Ok(duration)
    }

    pub fn days(value: u32) -> Result<Self, ValidationError> {
        Self::new(value, DurationUnit::Days)
    }

    pub fn weeks(value: u32) -> Result<Self, ValidationError> {
        Self::new(value, DurationUnit::Weeks)
    }

    pub fn months(value: u32) -> Result<Self, ValidationError> {
        Self::new(value, DurationUnit::Months)
    }

    pub fn years(value: u32) -> Result<Self, ValidationError> {
        Self::new(value, DurationUnit::Years)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.value == 0 {
            return Err(ValidationError::out_of_range(
                "duration.value",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(())
    }
}

/// A purchasable membership plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,

    /// Organization that sells this plan.
    pub tenant_id: TenantId,

    pub name: String,

    #[serde(rename = "type")]
    pub plan_type: PlanType,

    /// Present for duration plans, absent for session packs.
    pub duration: Option<PlanDuration>,

    /// Session quota; `None` means unlimited attendance.
    pub sessions: Option<u32>,

    /// List price handed to the invoicing collaborator on enrollment.
    pub price: Money,
}

impl Plan {
    /// Creates a time-boxed plan, optionally capped at a number of sessions.
    pub fn with_duration(
        id: PlanId,
        tenant_id: TenantId,
        name: impl Into<String>,
        duration: PlanDuration,
        sessions: Option<u32>,
        price: Money,
    ) -> Result<Self, ValidationError> {
        let plan = Self {
            id,
            tenant_id,
            name: name.into(),
            plan_type: PlanType::Duration,
            duration: Some(duration),
            sessions,
            price,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Creates a session pack that never expires by date.
    pub fn session_pack(
        id: PlanId,
        tenant_id: TenantId,
        name: impl Into<String>,
        sessions: u32,
        price: Money,
    ) -> Result<Self, ValidationError> {
        let plan = Self {
            id,
            tenant_id,
            name: name.into(),
            plan_type: PlanType::Sessions,
            duration: None,
            sessions: Some(sessions),
            price,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Checks the plan's internal consistency.
    ///
    /// Adapters call this on every plan they load, so the duration
    /// calculator never sees a malformed plan.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.price < Money::ZERO {
            return Err(ValidationError::invalid_format("price", "must not be negative"));
        }
        if self.sessions == Some(0) {
            return Err(ValidationError::out_of_range(
                "sessions",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }

        match self.plan_type {
            PlanType::Duration => match &self.duration {
                Some(duration) => duration.validate(),
                None => Err(ValidationError::empty_field("duration")),
            },
            PlanType::Sessions => {
                if self.sessions.is_none() {
                    return Err(ValidationError::empty_field("sessions"));
                }
                if self.duration.is_some() {
                    return Err(ValidationError::invalid_format(
                        "duration",
                        "session plans do not expire by date",
                    ));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("org-1").unwrap()
    }

    #[test]
    fn duration_rejects_zero() {
        assert!(PlanDuration::months(0).is_err());
        assert!(PlanDuration::days(1).is_ok());
    }

    #[test]
    fn duration_plan_is_built() {
        let plan = Plan::with_duration(
            PlanId::new(),
            tenant(),
            "Quarterly",
            PlanDuration::months(3).unwrap(),
            Some(36),
            Money::from_major(4500),
        )
        .unwrap();

        assert_eq!(plan.plan_type, PlanType::Duration);
        assert_eq!(plan.sessions, Some(36));
    }

    #[test]
    fn session_pack_has_no_duration() {
        let plan =
            Plan::session_pack(PlanId::new(), tenant(), "10 classes", 10, Money::from_major(900))
                .unwrap();
        assert_eq!(plan.plan_type, PlanType::Sessions);
        assert!(plan.duration.is_none());
    }

    #[test]
    fn session_pack_rejects_zero_sessions() {
        let err = Plan::session_pack(PlanId::new(), tenant(), "Empty", 0, Money::ZERO).unwrap_err();
        assert_eq!(err.field(), "sessions");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Plan::with_duration(
            PlanId::new(),
            tenant(),
            "  ",
            PlanDuration::days(7).unwrap(),
            None,
            Money::ZERO,
        )
        .unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Plan::with_duration(
            PlanId::new(),
            tenant(),
            "Weekly",
            PlanDuration::weeks(1).unwrap(),
            None,
            Money::from_major(-5),
        )
        .unwrap_err();
        assert_eq!(err.field(), "price");
    }

    #[test]
    fn deserialized_duration_plan_without_duration_fails_validation() {
        let json = serde_json::json!({
            "id": PlanId::new(),
            "tenant_id": "org-1",
            "name": "Broken",
            "type": "duration",
            "duration": null,
            "sessions": null,
            "price": "100"
        });
        let plan: Plan = serde_json::from_value(json).unwrap();
        assert_eq!(plan.validate().unwrap_err().field(), "duration");
    }

    #[test]
    fn unknown_unit_fails_to_deserialize() {
        let json = serde_json::json!({ "value": 3, "unit": "fortnights" });
        assert!(serde_json::from_value::<PlanDuration>(json).is_err());
    }
}
