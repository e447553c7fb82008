//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Membership Ports
//!
//! - `MemberRepository` - Tenant-scoped member documents
//! - `PlanCatalog` - Plan reference data
//!
//! ## Reporting Ports
//!
//! - `InvoiceReader` - Invoices and their billed line items
//! - `PaymentLedger` - Collected totals per invoice
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events

mod event_publisher;
mod invoice_reader;
mod member_repository;
mod payment_ledger;
mod plan_catalog;

pub use event_publisher::EventPublisher;
pub use invoice_reader::InvoiceReader;
pub use member_repository::MemberRepository;
pub use payment_ledger::PaymentLedger;
pub use plan_catalog::PlanCatalog;
