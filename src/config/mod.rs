//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `GYM_CORE` prefix and
//! nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use gym_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod logging;
mod reporting;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{Environment, LoggingConfig};
pub use reporting::ReportingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// PostgreSQL document store; in-memory adapters are used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GYM_CORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `GYM_CORE__LOGGING__LEVEL=debug` -> `logging.level = debug`
    /// - `GYM_CORE__DATABASE__URL=...` -> `database.url = ...`
    /// - `GYM_CORE__REPORTING__DEFAULT_BASIS=base_value`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GYM_CORE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.reporting.validate()?;
        Ok(())
    }

    pub fn uses_database(&self) -> bool {
        self.database.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::revenue::AmortizationBasis;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GYM_CORE__LOGGING__LEVEL",
        "GYM_CORE__LOGGING__JSON",
        "GYM_CORE__LOGGING__ENVIRONMENT",
        "GYM_CORE__DATABASE__URL",
        "GYM_CORE__DATABASE__MAX_CONNECTIONS",
        "GYM_CORE__REPORTING__DEFAULT_BASIS",
        "GYM_CORE__REPORTING__UNASSIGNED_GROUP_LABEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_defaults_without_database() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert!(!config.uses_database());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.reporting.default_basis, AmortizationBasis::PaidAmount);
        assert_eq!(config.reporting.unassigned_group_label, "Unassigned");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_nested_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GYM_CORE__LOGGING__ENVIRONMENT", "production");
        env::set_var("GYM_CORE__DATABASE__URL", "postgres://gym@localhost/gym");
        env::set_var("GYM_CORE__DATABASE__MAX_CONNECTIONS", "4");
        env::set_var("GYM_CORE__REPORTING__DEFAULT_BASIS", "base_value");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.logging.environment, Environment::Production);
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url, "postgres://gym@localhost/gym");
        assert_eq!(database.max_connections, 4);
        assert_eq!(config.reporting.default_basis, AmortizationBasis::BaseValue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_label_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GYM_CORE__REPORTING__UNASSIGNED_GROUP_LABEL", " ");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::BlankGroupLabel));
    }

    #[test]
    fn unknown_basis_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GYM_CORE__REPORTING__DEFAULT_BASIS", "cash");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
