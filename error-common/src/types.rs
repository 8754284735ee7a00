use thiserror::Error;

/// Simplified error enum used at the process edge
#[derive(Error, Debug)]
pub enum HospitalError {
    /// Billing rule or lookup failures
    #[error("[{code}] {message}")]
    Billing { code: &'static str, message: String },

    /// Database operation errors
    #[error("Database error [{code}]: {message}")]
    Database { code: &'static str, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HospitalError {
    pub fn billing(code: &'static str, message: impl Into<String>) -> Self {
        Self::Billing {
            code,
            message: message.into(),
        }
    }

    pub fn database(code: &'static str, message: impl Into<String>) -> Self {
        Self::Database {
            code,
            message: message.into(),
        }
    }

    /// Stable error code, when the failure carries one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Billing { code, .. } | Self::Database { code, .. } => Some(*code),
            Self::ConfigError(_) => Some(crate::codes::configuration::INVALID_CONFIG),
            Self::Other(_) => None,
        }
    }
}

/// Result type alias for hospital operations
pub type Result<T> = std::result::Result<T, HospitalError>;

/// Log an error with its code and the operation it came from
pub fn log_error(context: &str, error: &HospitalError) {
    tracing::error!(
        context = context,
        error_code = error.code().unwrap_or("UNCLASSIFIED"),
        error = %error,
        "Hospital operation failed"
    );
}
