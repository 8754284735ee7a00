use billing_service::{DischargeBillingService, PostgresHospitalStore, RateTable};
use clap::Parser;
use colored::*;
use config_engine::{ConfigEngine, HospitalConfig};
use database_layer::{DatabasePool, MigrationRunner};
use error_common::{log_error, HospitalError, Result};
use logger_redacted::{init_tracing, PiiRedactor};
use ops_cli::{load_env_file, render_rates, run_admission, run_bill, Cli, Command};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be in the environment before clap reads DATABASE_URL
    if let Err(e) = load_env_file(None) {
        eprintln!("{} failed to load .env: {}", "error:".bright_red().bold(), e);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error("hospital", &e);
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Vec<String>> {
    let config = load_config(&cli)?;
    init_tracing(&config.logging, cli.verbose)
        .map_err(|e| HospitalError::ConfigError(e.to_string()))?;

    info!(command = ?cli.command, "Running hospital command");

    match &cli.command {
        Command::Rates => Ok(render_rates(&RateTable::standard())),
        Command::Migrate => {
            let pool = DatabasePool::connect(&config.database).await?;
            let applied = MigrationRunner::new(pool.clone()).run().await;
            pool.close().await;
            Ok(vec![format!(
                "{} {} schema migration(s) applied",
                "✓".bright_green(),
                applied?
            )])
        }
        Command::Bill(bill) => {
            let pool = DatabasePool::connect(&config.database).await?;
            let lines = run_bill(&billing_service(&config, pool.clone()), bill).await;
            pool.close().await;
            Ok(lines?)
        }
        Command::Admission(admission) => {
            let pool = DatabasePool::connect(&config.database).await?;
            let lines = run_admission(&billing_service(&config, pool.clone()), admission).await;
            pool.close().await;
            Ok(lines?)
        }
    }
}

fn billing_service(config: &HospitalConfig, pool: DatabasePool) -> DischargeBillingService {
    DischargeBillingService::new(Arc::new(PostgresHospitalStore::new(pool)))
        .with_redactor(PiiRedactor::from_logger_config(&config.logging))
}

fn load_config(cli: &Cli) -> Result<HospitalConfig> {
    let mut config = ConfigEngine::new()
        .with_file(&cli.config)
        .load()
        .map_err(|e| HospitalError::ConfigError(e.to_string()))?;

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
        config
            .validate()
            .map_err(|e| HospitalError::ConfigError(e.to_string()))?;
    }

    Ok(config)
}
