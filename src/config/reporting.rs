//! Revenue reporting defaults

use serde::Deserialize;

use crate::domain::revenue::AmortizationBasis;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Basis used when a report request does not name one
    #[serde(default)]
    pub default_basis: AmortizationBasis,

    /// Row label for invoices without a branch or source
    #[serde(default = "default_unassigned_label")]
    pub unassigned_group_label: String,
}

impl ReportingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.unassigned_group_label.trim().is_empty() {
            return Err(ValidationError::BlankGroupLabel);
        }
        Ok(())
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_basis: AmortizationBasis::default(),
            unassigned_group_label: default_unassigned_label(),
        }
    }
}

fn default_unassigned_label() -> String {
    "Unassigned".to_string()
}
