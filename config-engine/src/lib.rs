//! Configuration management for the hospital billing engine
//!
//! Sources, lowest precedence first:
//!
//! - **Defaults**: [`HospitalConfig::default`]
//! - **Local file**: YAML, e.g. `hospital.yaml`
//! - **Environment**: `HOSPITAL_` prefixed variables, `__` separating nested keys
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigEngine;
//!
//! let config = ConfigEngine::new().with_file("hospital.yaml").load()?;
//! println!("database: {}", config.database.url);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```
//!
//! ```yaml
//! database:
//!   url: postgresql://localhost:5432/hospital
//!   max_connections: 10
//! logging:
//!   log_level: info
//!   format: json
//!   redaction_enabled: true
//! ```

pub mod engine;
pub mod error;
pub mod settings;

pub use engine::*;
pub use error::*;
pub use settings::*;
