//! In-memory invoice store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::revenue::{Invoice, InvoiceQuery};
use crate::ports::InvoiceReader;

/// Invoices in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<Vec<Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, invoice: Invoice) {
        self.invoices.write().await.push(invoice);
    }
}

#[async_trait]
impl InvoiceReader for InMemoryInvoiceStore {
    async fn list_invoices(
        &self,
        tenant_id: &TenantId,
        query: &InvoiceQuery,
    ) -> Result<Vec<Invoice>, DomainError> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter(|invoice| &invoice.tenant_id == tenant_id && query.matches(invoice))
            .cloned()
            .collect())
    }
}
