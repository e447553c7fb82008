//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and event plumbing that form
//! the vocabulary of the membership and revenue domains.

mod errors;
mod events;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent};
pub use ids::{InvoiceId, LineItemId, MemberId, PlanId, StaffId, TenantId};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
