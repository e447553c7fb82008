//! In-memory payment ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, InvoiceId, Money, TenantId};
use crate::ports::PaymentLedger;

/// Individual payments per tenant and invoice; totals are summed on read.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentLedger {
    payments: Arc<RwLock<HashMap<(TenantId, InvoiceId), Vec<Money>>>>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_payment(&self, tenant_id: &TenantId, invoice_id: InvoiceId, amount: Money) {
        self.payments
            .write()
            .await
            .entry((tenant_id.clone(), invoice_id))
            .or_default()
            .push(amount);
    }
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn collected_by_invoice(
        &self,
        tenant_id: &TenantId,
        invoice_ids: &[InvoiceId],
    ) -> Result<HashMap<InvoiceId, Money>, DomainError> {
        let payments = self.payments.read().await;
        Ok(invoice_ids
            .iter()
            .filter_map(|id| {
                payments
                    .get(&(tenant_id.clone(), *id))
                    .map(|amounts| (*id, amounts.iter().sum()))
            })
            .collect())
    }
}
