//! Plan end-date computation.

use chrono::{Days, Months, NaiveDate};

use super::{DurationUnit, Plan, PlanDuration, PlanType};

/// Computes when a plan started on a given date runs out.
pub struct PlanDurationCalculator;

impl PlanDurationCalculator {
    /// End date of `plan` when started on `start_date`.
    ///
    /// Session packs have no date-based end and yield `None`.
    pub fn compute_end_date(start_date: NaiveDate, plan: &Plan) -> Option<NaiveDate> {
        match plan.plan_type {
            PlanType::Sessions => None,
            PlanType::Duration => plan
                .duration
                .map(|duration| Self::add_duration(start_date, duration)),
        }
    }

    /// Adds a calendar duration to a date.
    ///
    /// Months and years clamp to the last valid day of the target month
    /// (Jan 31 + 1 month is Feb 28/29). Dates past chrono's range saturate.
    pub fn add_duration(start_date: NaiveDate, duration: PlanDuration) -> NaiveDate {
        let value = duration.value;
        let end = match duration.unit {
            DurationUnit::Days => start_date.checked_add_days(Days::new(u64::from(value))),
            DurationUnit::Weeks => start_date.checked_add_days(Days::new(u64::from(value) * 7)),
            DurationUnit::Months => start_date.checked_add_months(Months::new(value)),
            DurationUnit::Years => value
                .checked_mul(12)
                .and_then(|months| start_date.checked_add_months(Months::new(months))),
        };
        end.unwrap_or(NaiveDate::MAX)
    }
}
