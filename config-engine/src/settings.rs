use crate::error::{ConfigError, Result};
use database_layer::DatabaseSettings;
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

/// Everything the `hospital` binary needs to start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalConfig {
    pub database: DatabaseSettings,
    pub logging: LoggerConfig,
}

impl HospitalConfig {
    pub fn validate(&self) -> Result<()> {
        let url = &self.database.url;
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(ConfigError::ValidationError(
                "database.url must be a postgres:// or postgresql:// URL".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::ValidationError(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        Ok(())
    }
}
