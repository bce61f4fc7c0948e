use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, WalletId};

pub type OperationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// Credit the wallet
    Deposit,
    /// Debit the wallet
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "DEPOSIT",
            OperationType::Withdraw => "WITHDRAW",
        }
    }

    /// Exact, case-sensitive match against the stored names.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(OperationType::Deposit),
            "WITHDRAW" => Some(OperationType::Withdraw),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable audit record of one deposit or withdrawal.
/// Written in the same transaction as the balance change it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub wallet_id: WalletId,
    pub operation_type: OperationType,
    /// Amount in cents (always positive)
    pub amount: Cents,
    pub created_at: DateTime<Utc>,
}

impl Operation {
    pub fn new(wallet_id: WalletId, operation_type: OperationType, amount: Cents) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            operation_type,
            amount,
            created_at: Utc::now(),
        }
    }

    pub fn deposit(wallet_id: WalletId, amount: Cents) -> Self {
        Self::new(wallet_id, OperationType::Deposit, amount)
    }

    pub fn withdraw(wallet_id: WalletId, amount: Cents) -> Self {
        Self::new(wallet_id, OperationType::Withdraw, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_is_case_sensitive() {
        assert_eq!(OperationType::from_str("DEPOSIT"), Some(OperationType::Deposit));
        assert_eq!(OperationType::from_str("WITHDRAW"), Some(OperationType::Withdraw));
        assert_eq!(OperationType::from_str("deposit"), None);
        assert_eq!(OperationType::from_str(""), None);
    }

    #[test]
    fn test_constructors_set_type_and_fresh_id() {
        let wallet_id = Uuid::new_v4();
        let dep = Operation::deposit(wallet_id, 500);
        let wd = Operation::withdraw(wallet_id, 200);

        assert_eq!(dep.operation_type, OperationType::Deposit);
        assert_eq!(wd.operation_type, OperationType::Withdraw);
        assert_eq!(dep.wallet_id, wallet_id);
        assert_eq!(wd.amount, 200);
        assert_ne!(dep.id, wd.id);
    }
}
