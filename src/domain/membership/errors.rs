//! Membership-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MemberNotFound | 404 |
//! | PlanNotFound | 404 |
//! | Conflict | 409 |
//! | InvalidState | 422 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, PlanId, ValidationError};

/// What a conflicting request collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A freeze interval is already open.
    AlreadyFrozen,

    /// Freeze requested while the membership is not active.
    NotActive,

    /// Status says frozen but no freeze interval is open.
    NoActiveFreeze,

    /// Session quota used up.
    SessionsExhausted,

    /// Deletion refused while a plan is running.
    HasActivePlan,
}

impl ConflictKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictKind::AlreadyFrozen => "membership is already frozen",
            ConflictKind::NotActive => "membership is not active",
            ConflictKind::NoActiveFreeze => "membership is marked frozen but has no open freeze",
            ConflictKind::SessionsExhausted => "no sessions remaining on the current plan",
            ConflictKind::HasActivePlan => "member still has an active plan",
        }
    }
}

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Member does not exist in the tenant.
    MemberNotFound(MemberId),

    /// Plan does not exist or belongs to another tenant.
    PlanNotFound(PlanId),

    /// Request conflicts with the current freeze/session/plan state.
    Conflict(ConflictKind),

    /// Operation not valid for the current membership status.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// Malformed input.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Port failure.
    Infrastructure(String),
}

impl MembershipError {
    pub fn member_not_found(id: MemberId) -> Self {
        MembershipError::MemberNotFound(id)
    }

    pub fn plan_not_found(id: PlanId) -> Self {
        MembershipError::PlanNotFound(id)
    }

    pub fn already_frozen() -> Self {
        MembershipError::Conflict(ConflictKind::AlreadyFrozen)
    }

    pub fn conflict(kind: ConflictKind) -> Self {
        MembershipError::Conflict(kind)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            MembershipError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            MembershipError::Conflict(kind) => match kind {
                ConflictKind::AlreadyFrozen
                | ConflictKind::NotActive
                | ConflictKind::NoActiveFreeze => ErrorCode::FreezeConflict,
                ConflictKind::SessionsExhausted => ErrorCode::SessionsExhausted,
                ConflictKind::HasActivePlan => ErrorCode::MemberHasActivePlan,
            },
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::MemberNotFound(id) => format!("Member not found: {}", id),
            MembershipError::PlanNotFound(id) => format!("Plan not found: {}", id),
            MembershipError::Conflict(kind) => format!("Conflict: {}", kind.describe()),
            MembershipError::InvalidState { current, attempted } => {
                format!("Cannot {} membership in {} state", attempted, current)
            }
            MembershipError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MembershipError::Infrastructure(_))
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        MembershipError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => MembershipError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => MembershipError::InvalidState {
                current: err
                    .details
                    .get("from")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                attempted: err.message,
            },
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_not_found_maps_to_code() {
        let id = MemberId::new();
        let err = MembershipError::member_not_found(id);
        assert_eq!(err.code(), ErrorCode::MemberNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn freeze_conflicts_share_code() {
        for kind in [
            ConflictKind::AlreadyFrozen,
            ConflictKind::NotActive,
            ConflictKind::NoActiveFreeze,
        ] {
            assert_eq!(MembershipError::conflict(kind).code(), ErrorCode::FreezeConflict);
        }
    }

    #[test]
    fn sessions_exhausted_has_own_code() {
        assert_eq!(
            MembershipError::conflict(ConflictKind::SessionsExhausted).code(),
            ErrorCode::SessionsExhausted
        );
    }

    #[test]
    fn invalid_state_message_names_operation() {
        let err = MembershipError::invalid_state("active", "unfreeze");
        assert_eq!(err.message(), "Cannot unfreeze membership in active state");
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(MembershipError::infrastructure("db down").is_retryable());
        assert!(!MembershipError::already_frozen().is_retryable());
    }

    #[test]
    fn database_domain_error_becomes_infrastructure() {
        let err: MembershipError = DomainError::database("connection refused").into();
        assert!(matches!(err, MembershipError::Infrastructure(_)));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: MembershipError = DomainError::validation("end_date", "inverted").into();
        assert_eq!(
            err,
            MembershipError::ValidationFailed {
                field: "end_date".to_string(),
                message: "inverted".to_string(),
            }
        );
    }

    #[test]
    fn value_object_error_converts() {
        let err: MembershipError = ValidationError::empty_field("reason").into();
        assert!(matches!(err, MembershipError::ValidationFailed { ref field, .. } if field == "reason"));
    }

    #[test]
    fn converts_back_to_domain_error() {
        let domain: DomainError = MembershipError::already_frozen().into();
        assert_eq!(domain.code, ErrorCode::FreezeConflict);
    }
}
