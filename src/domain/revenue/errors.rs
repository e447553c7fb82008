//! Revenue recognition errors.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::foundation::{DomainError, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevenueError {
    #[error("service period ends {end} before it starts {start}")]
    InvertedServicePeriod { start: NaiveDate, end: NaiveDate },

    #[error("amortization base must be positive, got {0}")]
    NonPositiveAmount(Money),

    #[error("revenue source unavailable: {0}")]
    Infrastructure(String),
}

impl From<DomainError> for RevenueError {
    fn from(err: DomainError) -> Self {
        RevenueError::Infrastructure(err.to_string())
    }
}
