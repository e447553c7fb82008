//! Payment ledger port - collected amounts per invoice.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InvoiceId, Money, TenantId};

/// Totals of payments recorded against invoices.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Total collected for each of `invoice_ids`.
    ///
    /// Invoices without any payment are absent from the map.
    async fn collected_by_invoice(
        &self,
        tenant_id: &TenantId,
        invoice_ids: &[InvoiceId],
    ) -> Result<HashMap<InvoiceId, Money>, DomainError>;
}
