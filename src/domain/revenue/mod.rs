//! Revenue realization domain.
//!
//! Spreads billed amounts linearly over their service periods and buckets
//! them by calendar month for accrual reporting. Everything here is pure.

mod aggregator;
mod amortizer;
mod errors;
mod line_item;
mod month;

pub use aggregator::{
    AmortizationBasis, RevenueGrouping, RevenueRealization, RevenueRealizationAggregator,
    SkipReason, SkippedLineItem,
};
pub use amortizer::{RevenueAmortizer, RevenueBucket, RevenueSchedule};
pub use errors::RevenueError;
pub use line_item::{BilledLineItem, Invoice, InvoiceQuery};
pub use month::MonthKey;
