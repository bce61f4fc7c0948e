// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

// These tests need a PostgreSQL database. Run with:
//   DATABASE_URL=postgres://... cargo test -- --ignored

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use walletd::application::WalletService;
use walletd::domain::{Cents, Wallet, WalletId};
use walletd::storage::{PgTxManager, PgWalletRepository, PgWalletService, PoolSettings};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Helper to connect to the test database, applying the schema once per test binary.
pub async fn test_repo() -> Result<PgWalletRepository> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let settings = PoolSettings {
        max_connections: 10,
        min_connections: 0,
        ..PoolSettings::default()
    };
    let repo = PgWalletRepository::connect(&url, &settings).await?;
    MIGRATED.get_or_try_init(|| repo.migrate()).await?;
    Ok(repo)
}

/// Helper to create a test service and its repository
pub async fn test_service() -> Result<(PgWalletService, PgWalletRepository)> {
    let repo = test_repo().await?;
    let service = WalletService::new(repo.clone(), test_txm(&repo));
    Ok((service, repo))
}

pub fn test_txm(repo: &PgWalletRepository) -> PgTxManager {
    PgTxManager::new(repo.pool().clone())
}

/// Provision a wallet with the given opening balance.
pub async fn create_wallet(repo: &PgWalletRepository, balance: Cents) -> Result<WalletId> {
    let wallet = Wallet::new(balance);
    repo.create_wallet(&wallet).await?;
    Ok(wallet.id)
}

/// Number of audit rows recorded for a wallet.
pub async fn count_operations(repo: &PgWalletRepository, wallet_id: WalletId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallet_operations WHERE wallet_id = $1")
        .bind(wallet_id)
        .fetch_one(repo.pool())
        .await?;
    Ok(count)
}
