//! Common error handling utilities for the hospital billing engine
//!
//! Provides the error codes shared by every crate and the [`HospitalError`]
//! type that binaries convert crate-level errors into before reporting them.
//!
//! # Error Categories
//!
//! - **Billing**: discharge billing rule violations, each tagged with a stable code
//! - **Database**: connection, query and migration failures
//! - **Configuration**: invalid or missing configuration values
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, HospitalError};
//!
//! let err = HospitalError::billing(codes::billing::NOT_FOUND, "Admission 42 not found");
//! assert_eq!(err.code(), Some("BILLING_5001"));
//! ```

pub mod codes;
pub mod types;

pub use types::*;
