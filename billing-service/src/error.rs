use crate::models::AdmissionId;
use database_layer::DatabaseError;
use error_common::{codes, HospitalError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Bill already exists for admission {admission_id}")]
    Conflict { admission_id: AdmissionId },

    #[error("Store failure: {0}")]
    StoreFailure(#[from] DatabaseError),
}

impl BillingError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => codes::billing::NOT_FOUND,
            Self::InvalidState(_) => codes::billing::INVALID_STATE,
            Self::Conflict { .. } => codes::billing::CONFLICT,
            Self::StoreFailure(_) => codes::billing::STORE_FAILURE,
        }
    }

    /// Classify an `insert_bill` failure; uniqueness means someone billed first
    pub(crate) fn from_insert(admission_id: AdmissionId, err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(_) => Self::Conflict { admission_id },
            other => Self::StoreFailure(other),
        }
    }
}

impl From<BillingError> for HospitalError {
    fn from(err: BillingError) -> Self {
        HospitalError::billing(err.code(), err.to_string())
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
