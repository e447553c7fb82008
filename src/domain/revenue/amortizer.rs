//! Straight-line amortization of an amount over a service period.
//!
//! The period is inclusive at both ends. Each month it touches receives
//! `amount / total_days * overlap_days`, rounded to cents on its own. The
//! rounded buckets are not forced to add back up to the input amount.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

use super::{MonthKey, RevenueError};

/// Revenue recognized in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    pub month: MonthKey,

    /// `"Mon YYYY"`
    pub label: String,

    /// Days of the service period falling in this month.
    pub days: i64,

    pub amount: Money,
}

/// Month-keyed distribution of one amount, in chronological order.
pub type RevenueSchedule = BTreeMap<MonthKey, RevenueBucket>;

pub struct RevenueAmortizer;

impl RevenueAmortizer {
    /// Amortizes `amount` over an optional period.
    ///
    /// A missing start or end date yields an empty schedule: the caller skips
    /// the item instead of failing.
    pub fn amortize(
        amount: Money,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<RevenueSchedule, RevenueError> {
        match (start_date, end_date) {
            (Some(start), Some(end)) => Self::amortize_period(amount, start, end),
            _ => Ok(RevenueSchedule::new()),
        }
    }

    /// Amortizes `amount` over `[start_date, end_date]`.
    ///
    /// # Errors
    ///
    /// - `InvertedServicePeriod` when `end_date < start_date`
    /// - `NonPositiveAmount` when `amount <= 0`
    pub fn amortize_period(
        amount: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RevenueSchedule, RevenueError> {
        if end_date < start_date {
            return Err(RevenueError::InvertedServicePeriod {
                start: start_date,
                end: end_date,
            });
        }
        if !amount.is_positive() {
            return Err(RevenueError::NonPositiveAmount(amount));
        }

        let total_days = inclusive_days(start_date, end_date);
        let daily_rate = amount.amount() / Decimal::from(total_days);

        let mut schedule = RevenueSchedule::new();
        let mut cursor = Some(MonthKey::of(start_date));

        while let Some(month) = cursor {
            if month.first_day() > end_date {
                break;
            }

            let from = start_date.max(month.first_day());
            let to = end_date.min(month.last_day());
            let days = inclusive_days(from, to);

            schedule.insert(
                month,
                RevenueBucket {
                    month,
                    label: month.label(),
                    days,
                    amount: Money::new(daily_rate * Decimal::from(days)).round_cents(),
                },
            );
            cursor = month.next();
        }

        Ok(schedule)
    }
}

fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}
