// Schema migrations for the hospital store
use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::transaction::{IsolationLevel, TransactionManager};
use tracing::{debug, info};

/// One named, idempotent DDL statement
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Hospital schema in dependency order.
///
/// `billing.admission_id` is `UNIQUE`: the store, not the caller, guarantees
/// at most one bill per admission.
pub const HOSPITAL_SCHEMA: &[Migration] = &[
    Migration {
        name: "create_patients",
        sql: r#"
            CREATE TABLE IF NOT EXISTS patients (
                patient_id     BIGSERIAL PRIMARY KEY,
                name           TEXT NOT NULL,
                date_of_birth  DATE NOT NULL,
                gender         TEXT,
                blood_type     TEXT
            )
        "#,
    },
    Migration {
        name: "create_doctors",
        sql: r#"
            CREATE TABLE IF NOT EXISTS doctors (
                doctor_id   BIGSERIAL PRIMARY KEY,
                name        TEXT NOT NULL,
                department  TEXT NOT NULL
            )
        "#,
    },
    Migration {
        name: "create_admissions",
        sql: r#"
            CREATE TABLE IF NOT EXISTS admissions (
                admission_id    BIGSERIAL PRIMARY KEY,
                patient_id      BIGINT NOT NULL REFERENCES patients (patient_id),
                doctor_id       BIGINT NOT NULL REFERENCES doctors (doctor_id),
                admission_date  DATE NOT NULL,
                discharge_date  DATE,
                reason          TEXT,
                CONSTRAINT admissions_discharge_after_admission
                    CHECK (discharge_date IS NULL OR discharge_date >= admission_date)
            )
        "#,
    },
    Migration {
        name: "create_billing",
        sql: r#"
            CREATE TABLE IF NOT EXISTS billing (
                bill_id             BIGSERIAL PRIMARY KEY,
                admission_id        BIGINT NOT NULL UNIQUE REFERENCES admissions (admission_id),
                amount              NUMERIC(10, 2) NOT NULL CHECK (amount >= 0),
                status              TEXT NOT NULL DEFAULT 'Unpaid',
                insurance_provider  TEXT
            )
        "#,
    },
];

/// Applies [`HOSPITAL_SCHEMA`] inside a single serializable transaction
pub struct MigrationRunner {
    transactions: TransactionManager,
}

impl MigrationRunner {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            transactions: TransactionManager::new(pool)
                .with_isolation(IsolationLevel::Serializable),
        }
    }

    /// Run every migration; returns how many statements were applied
    pub async fn run(&self) -> DatabaseResult<usize> {
        let mut tx = self.transactions.begin().await?;

        for migration in HOSPITAL_SCHEMA {
            debug!(migration = migration.name, "Applying migration");
            sqlx::query(migration.sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::MigrationError(format!("{}: {}", migration.name, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("commit: {}", e)))?;

        info!(count = HOSPITAL_SCHEMA.len(), "Hospital schema is up to date");
        Ok(HOSPITAL_SCHEMA.len())
    }
}
