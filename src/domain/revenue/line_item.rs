//! Invoice data read from the billing collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InvoiceId, LineItemId, MemberId, Money, TenantId};

/// One billable service on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilledLineItem {
    pub id: LineItemId,
    pub description: String,

    /// First day of service; legacy items may lack it.
    pub start_date: Option<NaiveDate>,

    /// Last day of service, inclusive.
    pub expiry_date: Option<NaiveDate>,

    /// Net of discount and tax.
    pub amount: Money,
}

impl BilledLineItem {
    pub fn has_service_period(&self) -> bool {
        self.start_date.is_some() && self.expiry_date.is_some()
    }
}

/// An invoice and the attributes reports group by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub member_id: Option<MemberId>,
    pub branch: Option<String>,

    /// Sales channel, e.g. "walk-in" or "referral".
    pub source: Option<String>,

    pub issued_on: NaiveDate,

    /// Nominal invoice total.
    pub total: Money,

    pub items: Vec<BilledLineItem>,
}

impl Invoice {
    /// Sum of all line-item amounts.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }
}

/// Filter for listing invoices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
    pub branch: Option<String>,
    pub member_id: Option<MemberId>,
}

impl InvoiceQuery {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.issued_from.map_or(true, |from| invoice.issued_on >= from)
            && self.issued_to.map_or(true, |to| invoice.issued_on <= to)
            && self
                .branch
                .as_ref()
                .map_or(true, |branch| invoice.branch.as_ref() == Some(branch))
            && self
                .member_id
                .map_or(true, |member| invoice.member_id == Some(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(amount: i64) -> BilledLineItem {
        BilledLineItem {
            id: LineItemId::new(),
            description: "Monthly plan".to_string(),
            start_date: Some(date(2024, 1, 1)),
            expiry_date: None,
            amount: Money::from_major(amount),
        }
    }

    fn invoice() -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            tenant_id: TenantId::new("org-1").unwrap(),
            member_id: Some(MemberId::new()),
            branch: Some("north".to_string()),
            source: None,
            issued_on: date(2024, 1, 15),
            total: Money::from_major(300),
            items: vec![item(100), item(200)],
        }
    }

    #[test]
    fn items_total_sums_amounts() {
        assert_eq!(invoice().items_total(), Money::from_major(300));
    }

    #[test]
    fn item_without_expiry_has_no_service_period() {
        assert!(!item(10).has_service_period());
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(InvoiceQuery::default().matches(&invoice()));
    }

    #[test]
    fn query_filters_by_date_range_and_branch() {
        let inv = invoice();
        let in_range = InvoiceQuery {
            issued_from: Some(date(2024, 1, 1)),
            issued_to: Some(date(2024, 1, 31)),
            ..Default::default()
        };
        let other_branch = InvoiceQuery {
            branch: Some("south".to_string()),
            ..Default::default()
        };
        let too_late = InvoiceQuery {
            issued_from: Some(date(2024, 2, 1)),
            ..Default::default()
        };

        assert!(in_range.matches(&inv));
        assert!(!other_branch.matches(&inv));
        assert!(!too_late.matches(&inv));
    }
}
