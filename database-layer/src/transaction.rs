// Transaction management
use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Isolation levels the stores ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    Serializable,
}

impl IsolationLevel {
    fn as_sql(self) -> &'static str {
        match self {
            Self::ReadCommitted => "SET TRANSACTION ISOLATION LEVEL READ COMMITTED",
            Self::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

/// Begins transactions at a fixed isolation level
pub struct TransactionManager {
    pool: DatabasePool,
    isolation: IsolationLevel,
}

impl TransactionManager {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            isolation: IsolationLevel::default(),
        }
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = isolation;
        self
    }

    /// Begin a new transaction
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        debug!(isolation = ?self.isolation, "Beginning transaction");

        let mut tx = self.pool.pool().begin().await.map_err(|e| {
            DatabaseError::QueryFailed(format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(self.isolation.as_sql())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryFailed(format!("Failed to set isolation level: {}", e))
            })?;

        Ok(tx)
    }
}
