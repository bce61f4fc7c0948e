use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{credit, debit, Cents, Operation, OperationType, WalletId};

use super::{LedgerError, Scope, TxManager, WalletRepository};

/// Application service providing the ledger operations.
/// Deposits and withdrawals run as one unit of work each:
/// lock the wallet row, read, check, write the new balance, log the operation.
pub struct WalletService<R, T> {
    repo: R,
    txm: T,
}

impl<R, T> WalletService<R, T>
where
    T: TxManager,
    R: WalletRepository<Conn = T::Conn> + Clone + 'static,
{
    /// Create a new wallet service over the given repository and transaction manager.
    pub fn new(repo: R, txm: T) -> Self {
        Self { repo, txm }
    }

    /// Current balance, read without locking.
    #[instrument(skip(self))]
    pub async fn balance(&self, wallet_id: WalletId) -> Result<Cents, LedgerError> {
        self.repo.get_balance(Scope::Pool, wallet_id).await
    }

    /// Credit `amount` to the wallet. `amount` must already be validated as positive.
    #[instrument(skip(self))]
    pub async fn deposit(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError> {
        let repo = self.repo.clone();
        let new_balance = self
            .txm
            .run_in_tx(move |conn| {
                Box::pin(async move {
                    let balance = repo.get_balance_for_update(&mut *conn, wallet_id).await?;

                    let new_balance = credit(balance, amount)
                        .ok_or_else(|| anyhow!("Balance overflow on wallet {}", wallet_id))?;

                    repo.update_balance(Scope::Tx(&mut *conn), wallet_id, new_balance)
                        .await?;
                    repo.save_operation(Scope::Tx(&mut *conn), &Operation::deposit(wallet_id, amount))
                        .await?;
                    Ok(new_balance)
                })
            })
            .await?;

        debug!(new_balance, "deposit committed");
        Ok(())
    }

    /// Debit `amount` from the wallet, refusing to go below zero.
    /// A refused withdrawal leaves no trace: no balance change and no audit row.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError> {
        let repo = self.repo.clone();
        let new_balance = self
            .txm
            .run_in_tx(move |conn| {
                Box::pin(async move {
                    let balance = repo.get_balance_for_update(&mut *conn, wallet_id).await?;

                    let Some(new_balance) = debit(balance, amount) else {
                        debug!(balance, "withdrawal rejected");
                        return Err(LedgerError::InsufficientFunds {
                            wallet_id,
                            balance,
                            required: amount,
                        });
                    };

                    repo.update_balance(Scope::Tx(&mut *conn), wallet_id, new_balance)
                        .await?;
                    repo.save_operation(Scope::Tx(&mut *conn), &Operation::withdraw(wallet_id, amount))
                        .await?;
                    Ok(new_balance)
                })
            })
            .await?;

        debug!(new_balance, "withdrawal committed");
        Ok(())
    }
}

/// What the request boundary needs from the ledger.
#[async_trait]
pub trait WalletOperations: Send + Sync {
    async fn deposit(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError>;

    async fn withdraw(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError>;

    async fn balance(&self, wallet_id: WalletId) -> Result<Cents, LedgerError>;

    /// Dispatch a validated operation to deposit or withdraw.
    async fn apply(
        &self,
        wallet_id: WalletId,
        operation_type: OperationType,
        amount: Cents,
    ) -> Result<(), LedgerError> {
        match operation_type {
            OperationType::Deposit => self.deposit(wallet_id, amount).await,
            OperationType::Withdraw => self.withdraw(wallet_id, amount).await,
        }
    }
}

#[async_trait]
impl<R, T> WalletOperations for WalletService<R, T>
where
    T: TxManager,
    R: WalletRepository<Conn = T::Conn> + Clone + 'static,
{
    async fn deposit(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError> {
        WalletService::deposit(self, wallet_id, amount).await
    }

    async fn withdraw(&self, wallet_id: WalletId, amount: Cents) -> Result<(), LedgerError> {
        WalletService::withdraw(self, wallet_id, amount).await
    }

    async fn balance(&self, wallet_id: WalletId) -> Result<Cents, LedgerError> {
        WalletService::balance(self, wallet_id).await
    }
}
