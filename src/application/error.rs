use thiserror::Error;

use crate::domain::{Cents, WalletId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("Insufficient funds in wallet {wallet_id}: balance {balance}, required {required}")]
    InsufficientFunds {
        wallet_id: WalletId,
        balance: Cents,
        required: Cents,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(Cents),

    #[error("Invalid operation type: {0:?}")]
    InvalidOperationType(String),

    #[error("Operation type not specified")]
    OperationTypeNotSpecified,

    #[error("Invalid wallet ID: {0:?}")]
    InvalidWalletId(String),

    #[error("Rollback failed: {} (original: {original})", display_chain(.rollback))]
    Rollback {
        rollback: anyhow::Error,
        original: Box<LedgerError>,
    },

    #[error("Internal error: {}", display_chain(.0))]
    Internal(#[from] anyhow::Error),
}

/// Render the context chain as `outer: inner`, skipping causes whose text an
/// outer message already includes (sqlx database errors embed their source).
fn display_chain(err: &anyhow::Error) -> String {
    let mut out = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if out.contains(&text) {
            continue;
        }
        if !out.is_empty() {
            out.push_str(": ");
        }
        out.push_str(&text);
    }
    out
}

/// Stable classification of a [`LedgerError`], used by callers that branch on
/// the failure (HTTP status mapping, CLI exit messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    WalletNotFound,
    InsufficientFunds,
    InvalidAmount,
    InvalidOperationType,
    OperationTypeNotSpecified,
    InvalidWalletId,
    Internal,
}

impl ErrorKind {
    /// Request validation failures, rejected before reaching the ledger.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidAmount
                | ErrorKind::InvalidOperationType
                | ErrorKind::OperationTypeNotSpecified
                | ErrorKind::InvalidWalletId
        )
    }
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::WalletNotFound(_) => ErrorKind::WalletNotFound,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            LedgerError::InvalidOperationType(_) => ErrorKind::InvalidOperationType,
            LedgerError::OperationTypeNotSpecified => ErrorKind::OperationTypeNotSpecified,
            LedgerError::InvalidWalletId(_) => ErrorKind::InvalidWalletId,
            // The transaction outcome is unknown once rollback itself fails.
            LedgerError::Rollback { .. } | LedgerError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use uuid::Uuid;

    #[test]
    fn test_rollback_reports_both_failures() {
        let wallet_id = Uuid::new_v4();
        let err = LedgerError::Rollback {
            rollback: anyhow!("connection reset"),
            original: Box::new(LedgerError::WalletNotFound(wallet_id)),
        };

        let msg = err.to_string();
        assert!(msg.contains("connection reset"));
        assert!(msg.contains(&wallet_id.to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_internal_keeps_context_chain() {
        let err: LedgerError = anyhow!("connection refused")
            .context("Failed to fetch balance")
            .into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("Failed to fetch balance: connection refused"));
    }

    #[derive(Debug, Error)]
    #[error("error returned from database: {0}")]
    struct DatabaseError(#[source] std::io::Error);

    #[test]
    fn test_internal_does_not_repeat_embedded_source() {
        let source = std::io::Error::other("duplicate key value violates unique constraint");
        let err: LedgerError = anyhow::Error::new(DatabaseError(source))
            .context("Failed to commit transaction")
            .into();

        assert_eq!(
            err.to_string(),
            "Internal error: Failed to commit transaction: error returned from database: \
             duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_validation_kinds() {
        assert!(LedgerError::InvalidAmount(0).kind().is_validation());
        assert!(LedgerError::OperationTypeNotSpecified.kind().is_validation());
        assert!(!LedgerError::WalletNotFound(Uuid::nil()).kind().is_validation());
    }
}
