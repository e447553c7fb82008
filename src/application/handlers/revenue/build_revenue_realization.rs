//! BuildRevenueRealizationHandler - Query handler for the accrual revenue report.
//!
//! Loads the invoices matching the query, fetches collected totals when the
//! paid-amount basis is in use, and runs the aggregator. Line items that
//! cannot be amortized end up in the report's `skipped` list.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{InvoiceId, TenantId};
use crate::domain::revenue::{
    AmortizationBasis, InvoiceQuery, RevenueError, RevenueGrouping, RevenueRealization,
    RevenueRealizationAggregator,
};
use crate::ports::{InvoiceReader, PaymentLedger};

#[derive(Debug, Clone)]
pub struct BuildRevenueRealizationQuery {
    pub tenant_id: TenantId,
    pub filter: InvoiceQuery,
    /// Falls back to the handler's default basis.
    pub basis: Option<AmortizationBasis>,
    pub grouping: RevenueGrouping,
}

pub struct BuildRevenueRealizationHandler {
    invoices: Arc<dyn InvoiceReader>,
    payments: Arc<dyn PaymentLedger>,
    default_basis: AmortizationBasis,
    unassigned_label: Option<String>,
}

impl BuildRevenueRealizationHandler {
    pub fn new(invoices: Arc<dyn InvoiceReader>, payments: Arc<dyn PaymentLedger>) -> Self {
        Self {
            invoices,
            payments,
            default_basis: AmortizationBasis::default(),
            unassigned_label: None,
        }
    }

    pub fn with_default_basis(mut self, basis: AmortizationBasis) -> Self {
        self.default_basis = basis;
        self
    }

    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = Some(label.into());
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(
        &self,
        query: BuildRevenueRealizationQuery,
    ) -> Result<RevenueRealization, RevenueError> {
        let basis = query.basis.unwrap_or(self.default_basis);

        let invoices = self
            .invoices
            .list_invoices(&query.tenant_id, &query.filter)
            .await?;

        let collected = match basis {
            AmortizationBasis::PaidAmount if !invoices.is_empty() => {
                let ids: Vec<InvoiceId> = invoices.iter().map(|invoice| invoice.id).collect();
                self.payments
                    .collected_by_invoice(&query.tenant_id, &ids)
                    .await?
            }
            _ => HashMap::new(),
        };

        let mut aggregator = RevenueRealizationAggregator::new(basis, query.grouping);
        if let Some(label) = &self.unassigned_label {
            aggregator = aggregator.with_unassigned_label(label.clone());
        }
        let report = aggregator.aggregate(&invoices, &collected);

        tracing::info!(
            tenant_id = %query.tenant_id,
            invoices = invoices.len(),
            groups = report.rows.len(),
            months = report.months.len(),
            skipped = report.skipped.len(),
            "revenue realization built"
        );

        Ok(report)
    }
}
