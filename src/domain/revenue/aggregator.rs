//! Revenue realization report: amortized line items grouped by a dimension
//! and by month.
//!
//! # Design Decisions
//!
//! - **Skip, don't fail**: items without service dates, with inverted dates
//!   or with no positive base are listed in `skipped` and the report carries on.
//! - **Paid basis falls back to the nominal total** when nothing positive has
//!   been collected on the invoice, so unpaid invoices are not amortized as zero.
//! - **Stable month columns**: `months` holds every month any row touched, in
//!   order, so a table renders the same columns for every row.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InvoiceId, LineItemId, Money};

use super::{BilledLineItem, Invoice, MonthKey, RevenueAmortizer, RevenueError};

/// Which figure is spread over the service period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationBasis {
    /// Item's share of what was actually collected on its invoice.
    #[default]
    PaidAmount,
    /// Item's nominal amount.
    BaseValue,
}

/// Row dimension of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueGrouping {
    #[default]
    Member,
    Branch,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingServicePeriod,
    InvertedServicePeriod,
    NonPositiveBase,
}

/// A line item left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLineItem {
    pub invoice_id: InvoiceId,
    pub line_item_id: LineItemId,
    pub reason: SkipReason,
}

/// Group × month matrix of recognized revenue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRealization {
    /// Every month present in any row, chronological.
    pub months: Vec<MonthKey>,

    pub rows: BTreeMap<String, BTreeMap<MonthKey, Money>>,

    pub skipped: Vec<SkippedLineItem>,
}

impl RevenueRealization {
    /// Amount for one cell; zero when the row has nothing that month.
    pub fn cell(&self, group: &str, month: MonthKey) -> Money {
        self.rows
            .get(group)
            .and_then(|row| row.get(&month))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn row_total(&self, group: &str) -> Money {
        self.rows
            .get(group)
            .map(|row| row.values().sum())
            .unwrap_or(Money::ZERO)
    }

    pub fn month_total(&self, month: MonthKey) -> Money {
        self.rows.values().filter_map(|row| row.get(&month)).sum()
    }

    pub fn grand_total(&self) -> Money {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    /// `(key, label)` pairs for the month columns.
    pub fn month_columns(&self) -> Vec<(String, String)> {
        self.months
            .iter()
            .map(|month| (month.to_string(), month.label()))
            .collect()
    }
}

/// Builds a [`RevenueRealization`] from invoices.
#[derive(Debug, Clone)]
pub struct RevenueRealizationAggregator {
    basis: AmortizationBasis,
    grouping: RevenueGrouping,
    unassigned_label: String,
}

impl RevenueRealizationAggregator {
    pub fn new(basis: AmortizationBasis, grouping: RevenueGrouping) -> Self {
        Self {
            basis,
            grouping,
            unassigned_label: "Unassigned".to_string(),
        }
    }

    /// Row label for invoices lacking the grouping attribute.
    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = label.into();
        self
    }

    /// Aggregates every line item of `invoices`.
    ///
    /// `collected` maps invoice ids to the total collected on them; it is
    /// only consulted on the paid-amount basis.
    pub fn aggregate(
        &self,
        invoices: &[Invoice],
        collected: &HashMap<InvoiceId, Money>,
    ) -> RevenueRealization {
        let mut report = RevenueRealization::default();
        let mut months = BTreeSet::new();

        for invoice in invoices {
            let group = self.group_of(invoice);
            let items_total = invoice.items_total();

            for item in &invoice.items {
                let skip = |reason: SkipReason| {
                    tracing::debug!(
                        invoice_id = %invoice.id,
                        line_item_id = %item.id,
                        ?reason,
                        "line item left out of revenue realization"
                    );
                    SkippedLineItem {
                        invoice_id: invoice.id,
                        line_item_id: item.id,
                        reason,
                    }
                };

                if !item.has_service_period() {
                    report.skipped.push(skip(SkipReason::MissingServicePeriod));
                    continue;
                }

                let Some(base) = self.base_for(invoice, item, items_total, collected) else {
                    report.skipped.push(skip(SkipReason::NonPositiveBase));
                    continue;
                };

                match RevenueAmortizer::amortize(base, item.start_date, item.expiry_date) {
                    Ok(schedule) => {
                        let row = report.rows.entry(group.clone()).or_default();
                        for (month, bucket) in schedule {
                            *row.entry(month).or_insert(Money::ZERO) += bucket.amount;
                            months.insert(month);
                        }
                    }
                    Err(RevenueError::InvertedServicePeriod { .. }) => {
                        report.skipped.push(skip(SkipReason::InvertedServicePeriod));
                    }
                    Err(_) => {
                        report.skipped.push(skip(SkipReason::NonPositiveBase));
                    }
                }
            }
        }

        report.months = months.into_iter().collect();
        report
    }

    /// Amount to amortize for `item`, `None` when there is nothing to spread.
    fn base_for(
        &self,
        invoice: &Invoice,
        item: &BilledLineItem,
        items_total: Money,
        collected: &HashMap<InvoiceId, Money>,
    ) -> Option<Money> {
        let base = match self.basis {
            AmortizationBasis::BaseValue => item.amount,
            AmortizationBasis::PaidAmount => {
                let proportion = item.amount.ratio_of(items_total)?;
                let paid = collected
                    .get(&invoice.id)
                    .copied()
                    .filter(Money::is_positive)
                    .unwrap_or(invoice.total);
                paid.scale(proportion)
            }
        };
        base.is_positive().then_some(base)
    }

    fn group_of(&self, invoice: &Invoice) -> String {
        let value = match self.grouping {
            RevenueGrouping::Member => invoice.member_id.map(|id| id.to_string()),
            RevenueGrouping::Branch => invoice.branch.clone(),
            RevenueGrouping::Source => invoice.source.clone(),
        };
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.unassigned_label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MemberId, TenantId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::of(date(y, m, 1))
    }

    fn item(amount: i64, start: Option<NaiveDate>, end: Option<NaiveDate>) -> BilledLineItem {
        BilledLineItem {
            id: LineItemId::new(),
            description: "Plan".to_string(),
            start_date: start,
            expiry_date: end,
            amount: Money::from_major(amount),
        }
    }

    fn invoice(branch: Option<&str>, total: i64, items: Vec<BilledLineItem>) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            tenant_id: TenantId::new("org-1").unwrap(),
            member_id: Some(MemberId::new()),
            branch: branch.map(str::to_string),
            source: None,
            issued_on: date(2024, 1, 1),
            total: Money::from_major(total),
            items,
        }
    }

    fn january() -> (Option<NaiveDate>, Option<NaiveDate>) {
        (Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
    }

    #[test]
    fn base_value_amortizes_nominal_amounts() {
        let (start, end) = january();
        let inv = invoice(Some("north"), 300, vec![item(300, start, end)]);
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        assert_eq!(report.months, vec![month(2024, 1)]);
        assert_eq!(report.cell("north", month(2024, 1)), Money::from_major(300));
    }

    #[test]
    fn paid_amount_uses_share_of_collected() {
        let (start, end) = january();
        let inv = invoice(
            Some("north"),
            400,
            vec![item(100, start, end), item(300, start, end)],
        );
        let collected = HashMap::from([(inv.id, Money::from_major(200))]);
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::PaidAmount, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[inv], &collected);

        // 200 collected split 1:3
        assert_eq!(report.row_total("north"), Money::from_major(200));
    }

    #[test]
    fn paid_amount_falls_back_to_invoice_total_without_payments() {
        let (start, end) = january();
        let inv = invoice(Some("north"), 250, vec![item(250, start, end)]);
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::PaidAmount, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        assert_eq!(report.row_total("north"), Money::from_major(250));
    }

    #[test]
    fn items_without_dates_are_skipped() {
        let (start, end) = january();
        let inv = invoice(
            Some("north"),
            300,
            vec![item(100, None, end), item(200, start, end)],
        );
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::MissingServicePeriod);
        assert_eq!(report.grand_total(), Money::from_major(200));
    }

    #[test]
    fn inverted_and_zero_items_are_skipped_with_reason() {
        let inv = invoice(
            Some("north"),
            100,
            vec![
                item(100, Some(date(2024, 2, 1)), Some(date(2024, 1, 1))),
                item(0, Some(date(2024, 1, 1)), Some(date(2024, 1, 2))),
            ],
        );
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        let reasons: Vec<_> = report.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::InvertedServicePeriod, SkipReason::NonPositiveBase]
        );
        assert!(report.rows.is_empty());
        assert!(report.months.is_empty());
    }

    #[test]
    fn months_are_union_across_rows() {
        let north = invoice(
            Some("north"),
            100,
            vec![item(100, Some(date(2024, 1, 10)), Some(date(2024, 1, 20)))],
        );
        let south = invoice(
            Some("south"),
            100,
            vec![item(100, Some(date(2024, 3, 10)), Some(date(2024, 3, 20)))],
        );
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[south, north], &HashMap::new());

        assert_eq!(report.months, vec![month(2024, 1), month(2024, 3)]);
        assert_eq!(report.cell("north", month(2024, 3)), Money::ZERO);
        assert_eq!(report.month_total(month(2024, 3)), Money::from_major(100));
        assert_eq!(
            report.month_columns(),
            vec![
                ("2024-01".to_string(), "Jan 2024".to_string()),
                ("2024-03".to_string(), "Mar 2024".to_string()),
            ]
        );
    }

    #[test]
    fn missing_group_attribute_uses_unassigned_label() {
        let (start, end) = january();
        let inv = invoice(None, 100, vec![item(100, start, end)]);
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch)
                .with_unassigned_label("No branch");

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        assert_eq!(report.row_total("No branch"), Money::from_major(100));
    }

    #[test]
    fn same_group_rows_are_merged() {
        let (start, end) = january();
        let first = invoice(Some("north"), 100, vec![item(100, start, end)]);
        let second = invoice(Some("north"), 50, vec![item(50, start, end)]);
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Branch);

        let report = aggregator.aggregate(&[first, second], &HashMap::new());

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.cell("north", month(2024, 1)), Money::from_major(150));
    }

    #[test]
    fn grouping_by_member_uses_member_id() {
        let (start, end) = january();
        let inv = invoice(None, 100, vec![item(100, start, end)]);
        let member = inv.member_id.unwrap().to_string();
        let aggregator =
            RevenueRealizationAggregator::new(AmortizationBasis::BaseValue, RevenueGrouping::Member);

        let report = aggregator.aggregate(&[inv], &HashMap::new());

        assert_eq!(report.row_total(&member), Money::from_major(100));
    }
}
