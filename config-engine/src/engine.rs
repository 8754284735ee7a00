use crate::error::Result;
use crate::settings::HospitalConfig;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENV_PREFIX: &str = "HOSPITAL_";

/// Merges defaults, an optional YAML file and prefixed environment variables,
/// later sources overriding earlier ones.
#[derive(Debug, Clone)]
pub struct ConfigEngine {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// YAML file to layer over the defaults; a missing file is skipped
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(HospitalConfig::default()));

        if let Some(path) = &self.file {
            figment = figment.merge(Yaml::file(path));
        }

        // HOSPITAL_DATABASE__URL -> database.url
        figment.merge(Env::prefixed(&self.env_prefix).split("__"))
    }

    /// Extract and validate the configuration
    pub fn load(&self) -> Result<HospitalConfig> {
        let config: HospitalConfig = self.figment().extract()?;
        config.validate()?;

        debug!(
            file = ?self.file,
            env_prefix = %self.env_prefix,
            "Configuration loaded"
        );

        Ok(config)
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}
