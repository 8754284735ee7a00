//! Operations CLI for hospital discharge billing
//!
//! # Example Usage
//!
//! ```bash
//! # Provision the store
//! hospital migrate
//!
//! # Discharge and bill
//! hospital admission discharge 7 --date 2024-01-08
//! hospital bill quote 7
//! hospital bill generate 7
//! # Bill generated for Admission 7: $11000.00
//!
//! # Catch up on every discharged admission without a bill
//! hospital bill outstanding
//!
//! hospital rates
//! ```

pub mod cli;
pub mod commands;

pub use cli::*;
pub use commands::*;
