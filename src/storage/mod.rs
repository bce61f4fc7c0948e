mod pool;
mod repository;
mod transaction;

pub use pool::*;
pub use repository::*;
pub use transaction::*;

use crate::application::WalletService;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Ledger service wired to PostgreSQL.
pub type PgWalletService = WalletService<PgWalletRepository, PgTxManager>;

impl WalletService<PgWalletRepository, PgTxManager> {
    /// Build the service on the repository's pool.
    pub fn from_repository(repo: PgWalletRepository) -> Self {
        let txm = PgTxManager::new(repo.pool().clone());
        Self::new(repo, txm)
    }
}
