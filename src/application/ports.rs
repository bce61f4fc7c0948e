//! Seams between the ledger service and the store.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::{Cents, Operation, WalletId};

use super::LedgerError;

/// Where a repository call runs.
///
/// Repository methods are written once and take a scope, so the same query
/// works standalone (`Pool`) or as part of a unit of work (`Tx`).
pub enum Scope<'a, C> {
    /// A plain connection checked out from the repository's pool.
    Pool,
    /// The connection of the currently open transaction.
    Tx(&'a mut C),
}

/// Runs units of work atomically.
#[async_trait]
pub trait TxManager: Send + Sync {
    /// Connection handed to the unit of work while its transaction is open.
    type Conn: Send;

    /// Begin a transaction, run `work` on it, then commit if it succeeded or
    /// roll back if it failed.
    ///
    /// A failed rollback is reported together with the original failure.
    /// A failed commit fails the whole call. Nested transactions are not
    /// supported: `work` must not call `run_in_tx` again.
    async fn run_in_tx<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c mut Self::Conn) -> BoxFuture<'c, Result<T, LedgerError>>
            + Send
            + 'static;
}

/// Balance and audit-log queries. The only component that talks to the store.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    type Conn: Send;

    /// Non-locking read. The value may be stale as soon as it is returned.
    async fn get_balance(
        &self,
        scope: Scope<'_, Self::Conn>,
        wallet_id: WalletId,
    ) -> Result<Cents, LedgerError>;

    /// Locking read: also takes an exclusive lock on the wallet row, held
    /// until the enclosing transaction ends.
    ///
    /// `conn` must belong to an open transaction. On an autocommit
    /// connection the lock is released as soon as the statement finishes.
    async fn get_balance_for_update(
        &self,
        conn: &mut Self::Conn,
        wallet_id: WalletId,
    ) -> Result<Cents, LedgerError>;

    /// Overwrite the stored balance and refresh `updated_at`.
    /// Call only after `get_balance_for_update` on the same wallet in the same
    /// transaction.
    async fn update_balance(
        &self,
        scope: Scope<'_, Self::Conn>,
        wallet_id: WalletId,
        new_balance: Cents,
    ) -> Result<(), LedgerError>;

    /// Append one audit row.
    async fn save_operation(
        &self,
        scope: Scope<'_, Self::Conn>,
        operation: &Operation,
    ) -> Result<(), LedgerError>;
}
