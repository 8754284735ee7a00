use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::Path;

/// Load a `.env` file into the process environment before arguments are
/// parsed, so `DATABASE_URL` can come from it. Without a path the current
/// directory and its parents are searched. A missing file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<(), dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    match loaded {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

/// Hospital discharge billing operations
#[derive(Parser, Debug)]
#[command(name = "hospital", version)]
#[command(about = "Discharge billing and hospital store administration")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "hospital.yaml")]
    pub config: String,

    /// Database URL, overrides the configuration file
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discharge billing
    #[command(subcommand)]
    Bill(BillCommand),

    /// Admission maintenance
    #[command(subcommand)]
    Admission(AdmissionCommand),

    /// Print the department rate table
    Rates,

    /// Create the hospital tables if they do not exist
    Migrate,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum BillCommand {
    /// Generate the bill for a discharged admission
    Generate(AdmissionArg),

    /// Show what the bill would be without writing it
    Quote(AdmissionArg),

    /// Print the stored bill as JSON
    Show(AdmissionArg),

    /// Bill every discharged admission that has no bill yet
    Outstanding,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AdmissionCommand {
    /// Record the discharge date of an open admission
    Discharge {
        admission_id: i64,

        /// Discharge date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct AdmissionArg {
    pub admission_id: i64,
}
