//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, money, timestamps, errors, events)
//! - `membership` - Plans, freeze ledger and the membership lifecycle
//! - `revenue` - Revenue amortization and realization reporting

pub mod foundation;
pub mod membership;
pub mod revenue;
