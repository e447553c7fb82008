//! In-memory adapters.
//!
//! Process-local implementations of the repository and reader ports, used by
//! integration tests and local tooling when no database is configured.

mod invoice_store;
mod member_store;
mod payment_ledger;
mod plan_catalog;

pub use invoice_store::InMemoryInvoiceStore;
pub use member_store::InMemoryMemberStore;
pub use payment_ledger::InMemoryPaymentLedger;
pub use plan_catalog::InMemoryPlanCatalog;
