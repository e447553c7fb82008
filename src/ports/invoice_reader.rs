//! Invoice reader port - line-item source for revenue reports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::revenue::{Invoice, InvoiceQuery};

/// Read-only access to the invoices of a tenant.
#[async_trait]
pub trait InvoiceReader: Send + Sync {
    /// Lists invoices of `tenant_id` matching `query`, items included.
    async fn list_invoices(
        &self,
        tenant_id: &TenantId,
        query: &InvoiceQuery,
    ) -> Result<Vec<Invoice>, DomainError>;
}
