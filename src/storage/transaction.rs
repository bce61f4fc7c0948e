use anyhow::Context;
use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, error};

use crate::application::{LedgerError, TxManager};

/// Runs units of work in READ COMMITTED transactions on a PostgreSQL pool.
///
/// Ordering-sensitive reads take explicit row locks (`FOR UPDATE`), so the
/// weaker isolation level is enough.
#[derive(Clone)]
pub struct PgTxManager {
    pool: PgPool,
}

impl PgTxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TxManager for PgTxManager {
    type Conn = PgConnection;

    /// If the returned future is dropped before completion, the open
    /// `sqlx::Transaction` is dropped with it and the transaction is rolled
    /// back when the connection goes back to the pool.
    async fn run_in_tx<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c mut Self::Conn) -> BoxFuture<'c, Result<T, LedgerError>>
            + Send
            + 'static,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await
            .context("Failed to set isolation level")?;

        let outcome = work(&mut *tx).await;
        match outcome {
            Ok(value) => {
                tx.commit().await.context("Failed to commit transaction")?;
                Ok(value)
            }
            Err(err) => match tx.rollback().await {
                Ok(()) => {
                    debug!(error = %err, "transaction rolled back");
                    Err(err)
                }
                Err(rollback_err) => {
                    error!(error = %err, rollback_error = %rollback_err, "rollback failed");
                    Err(LedgerError::Rollback {
                        rollback: anyhow::Error::new(rollback_err),
                        original: Box::new(err),
                    })
                }
            },
        }
    }
}
