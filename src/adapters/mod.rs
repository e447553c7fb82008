//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-memory event bus
//! - `memory` - In-memory stores for members, plans, invoices and payments
//! - `postgres` - JSONB document store for members and plans

pub mod events;
pub mod memory;
pub mod postgres;

pub use events::InMemoryEventBus;
pub use memory::{InMemoryInvoiceStore, InMemoryMemberStore, InMemoryPaymentLedger, InMemoryPlanCatalog};
pub use postgres::{PostgresMemberRepository, PostgresPlanCatalog};
