//! Discharge billing for hospital admissions
//!
//! Given a discharged admission, the service:
//! - derives the length of stay (at least one billable day)
//! - resolves the attending doctor's department daily rate
//! - charges `base fee + days * daily rate`, fixed to 2 decimal places
//! - writes exactly one `Unpaid` bill per admission
//!
//! Storage goes through the [`HospitalStore`] trait, injected as an
//! `Arc<dyn HospitalStore>`; uniqueness of the bill per admission is enforced
//! by the store at insert time.
//!
//! # Example
//!
//! ```rust,no_run
//! use billing_service::{DischargeBillingService, InMemoryHospitalStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), billing_service::BillingError> {
//! let service = DischargeBillingService::new(Arc::new(InMemoryHospitalStore::new()));
//! let bill = service.generate_discharge_bill(7).await?;
//! println!("{}", bill.confirmation_message());
//! # Ok(())
//! # }
//! ```

pub mod calculator;
pub mod error;
pub mod models;
pub mod rates;
pub mod service;
pub mod store;

pub use calculator::*;
pub use error::*;
pub use models::*;
pub use rates::*;
pub use service::*;
pub use store::*;
