use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::application::{LedgerError, Scope, WalletRepository};
use crate::domain::{Cents, Operation, OperationType, Wallet, WalletId};

use super::{connect, PoolSettings, MIGRATION_001_INITIAL};

const SELECT_BALANCE: &str = "SELECT balance FROM wallets WHERE id = $1";
const SELECT_BALANCE_FOR_UPDATE: &str = "SELECT balance FROM wallets WHERE id = $1 FOR UPDATE";

/// Repository for wallet balances and the operation log on PostgreSQL.
///
/// Every query takes a [`Scope`]: `Scope::Pool` runs on a pooled connection,
/// `Scope::Tx` on the connection of the caller's open transaction.
#[derive(Clone)]
pub struct PgWalletRepository {
    pool: PgPool,
}

impl PgWalletRepository {
    /// Create a new repository with the given PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at the given URL.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let pool = connect(database_url, settings).await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize the database (connect + migrate).
    pub async fn init(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let repo = Self::connect(database_url, settings).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ========================
    // Wallet provisioning
    // ========================

    /// Save a new wallet. Provisioning only; balances change through the ledger service.
    pub async fn create_wallet(&self, wallet: &Wallet) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wallets (id, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(wallet.id)
        .bind(wallet.balance)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to save wallet")?;
        Ok(())
    }

    /// Get a wallet by ID.
    pub async fn get_wallet(&self, id: WalletId) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, balance, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet")?;

        Ok(row.map(|row| Wallet {
            id: row.get("id"),
            balance: row.get("balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    // ========================
    // Operation log
    // ========================

    /// List operations recorded for a wallet, newest first.
    pub async fn list_operations(&self, wallet_id: WalletId, limit: i64) -> Result<Vec<Operation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, wallet_id, operation, amount, created_at
            FROM wallet_operations
            WHERE wallet_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(wallet_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list operations")?;

        rows.iter().map(Self::row_to_operation).collect()
    }

    fn row_to_operation(row: &PgRow) -> Result<Operation> {
        let operation_str: String = row.get("operation");
        let created_at: DateTime<Utc> = row.get("created_at");

        Ok(Operation {
            id: row.get("id"),
            wallet_id: row.get("wallet_id"),
            operation_type: OperationType::from_str(&operation_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid operation type: {}", operation_str))?,
            amount: row.get("amount"),
            created_at,
        })
    }

    async fn scan_balance(
        &self,
        scope: Scope<'_, PgConnection>,
        wallet_id: WalletId,
        sql: &'static str,
    ) -> Result<Cents, LedgerError> {
        let query = sqlx::query_scalar::<_, i64>(sql).bind(wallet_id);
        let balance = match scope {
            Scope::Pool => query.fetch_optional(&self.pool).await,
            Scope::Tx(conn) => query.fetch_optional(conn).await,
        }
        .context("Failed to fetch balance")?;

        balance.ok_or(LedgerError::WalletNotFound(wallet_id))
    }
}

#[async_trait]
impl WalletRepository for PgWalletRepository {
    type Conn = PgConnection;

    async fn get_balance(
        &self,
        scope: Scope<'_, PgConnection>,
        wallet_id: WalletId,
    ) -> Result<Cents, LedgerError> {
        self.scan_balance(scope, wallet_id, SELECT_BALANCE).await
    }

    async fn get_balance_for_update(
        &self,
        conn: &mut PgConnection,
        wallet_id: WalletId,
    ) -> Result<Cents, LedgerError> {
        self.scan_balance(Scope::Tx(conn), wallet_id, SELECT_BALANCE_FOR_UPDATE)
            .await
    }

    async fn update_balance(
        &self,
        scope: Scope<'_, PgConnection>,
        wallet_id: WalletId,
        new_balance: Cents,
    ) -> Result<(), LedgerError> {
        // balance >= 0 is also enforced by a CHECK constraint
        let query = sqlx::query("UPDATE wallets SET balance = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_balance)
            .bind(wallet_id);
        let result = match scope {
            Scope::Pool => query.execute(&self.pool).await,
            Scope::Tx(conn) => query.execute(conn).await,
        }
        .context("Failed to update balance")?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::WalletNotFound(wallet_id));
        }
        Ok(())
    }

    async fn save_operation(
        &self,
        scope: Scope<'_, PgConnection>,
        operation: &Operation,
    ) -> Result<(), LedgerError> {
        let query = sqlx::query(
            r#"
            INSERT INTO wallet_operations (id, wallet_id, operation, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(operation.id)
        .bind(operation.wallet_id)
        .bind(operation.operation_type.as_str())
        .bind(operation.amount)
        .bind(operation.created_at);

        let result = match scope {
            Scope::Pool => query.execute(&self.pool).await,
            Scope::Tx(conn) => query.execute(conn).await,
        };
        result.context("Failed to save operation")?;

        Ok(())
    }
}
