//! Database layer for the hospital billing engine
//!
//! Owns everything about talking to PostgreSQL that is not specific to one
//! store: the connection pool, transaction setup, the relational schema and
//! the classification of failures into [`DatabaseError`].
//!
//! # Schema
//!
//! `patients`, `doctors`, `admissions` and `billing`, with a `UNIQUE`
//! constraint on `billing.admission_id` and a check that a discharge date
//! never precedes its admission date.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use database_layer::{DatabasePool, DatabaseSettings, MigrationRunner};
//!
//! # async fn run() -> Result<(), database_layer::DatabaseError> {
//! let pool = DatabasePool::connect(&DatabaseSettings::default()).await?;
//! MigrationRunner::new(pool.clone()).run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod migration;
pub mod transaction;

pub use config::*;
pub use connection::*;
pub use error::*;
pub use migration::*;
pub use transaction::*;
