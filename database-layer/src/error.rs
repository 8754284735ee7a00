use error_common::{codes, HospitalError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    SqlxError(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl DatabaseError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => codes::database::CONNECTION_FAILED,
            Self::UniqueViolation(_) => codes::database::CONSTRAINT_VIOLATION,
            Self::MigrationError(_) => codes::database::MIGRATION_FAILED,
            Self::QueryFailed(_) | Self::SqlxError(_) | Self::InternalError(_) => {
                codes::database::QUERY_FAILED
            }
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation(db_err.message().to_string());
            }
        }
        Self::SqlxError(err)
    }
}

impl From<DatabaseError> for HospitalError {
    fn from(err: DatabaseError) -> Self {
        HospitalError::database(err.code(), err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DatabaseError::UniqueViolation("billing_admission_id_key".into()).code(),
            "DB_4003"
        );
        assert_eq!(DatabaseError::from(sqlx::Error::RowNotFound).code(), "DB_4002");
    }

    #[test]
    fn test_connection_failure_keeps_code_at_the_edge() {
        let err = HospitalError::from(DatabaseError::ConnectionFailed("pool timed out".into()));
        assert_eq!(err.code(), Some("DB_4001"));

        let err = HospitalError::from(DatabaseError::MigrationError("patients".into()));
        assert_eq!(err.code(), Some("DB_4004"));
    }
}
