//! Input checks shared by the HTTP boundary and the CLI.
//!
//! The ledger service assumes its inputs already passed through here.

use uuid::Uuid;

use crate::domain::{Cents, OperationType, WalletId};

use super::LedgerError;

/// Parse an operation type. Surrounding whitespace is ignored, case is not.
pub fn parse_operation_type(input: &str) -> Result<OperationType, LedgerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::OperationTypeNotSpecified);
    }
    OperationType::from_str(trimmed)
        .ok_or_else(|| LedgerError::InvalidOperationType(trimmed.to_string()))
}

/// Amounts are strictly positive integers in the smallest currency unit.
pub fn validate_amount(amount: Cents) -> Result<Cents, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Parse a wallet ID, rejecting the nil UUID.
pub fn parse_wallet_id(input: &str) -> Result<WalletId, LedgerError> {
    let id = Uuid::parse_str(input.trim())
        .map_err(|_| LedgerError::InvalidWalletId(input.to_string()))?;
    if id.is_nil() {
        return Err(LedgerError::InvalidWalletId(input.to_string()));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ErrorKind;

    #[test]
    fn test_parse_operation_type() {
        assert_eq!(parse_operation_type("DEPOSIT").unwrap(), OperationType::Deposit);
        assert_eq!(parse_operation_type("  WITHDRAW\n").unwrap(), OperationType::Withdraw);

        let err = parse_operation_type("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationTypeNotSpecified);

        let err = parse_operation_type("withdraw").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperationType);

        let err = parse_operation_type("TRANSFER").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperationType);
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(1).unwrap(), 1);
        assert_eq!(validate_amount(0).unwrap_err().kind(), ErrorKind::InvalidAmount);
        assert_eq!(validate_amount(-50).unwrap_err().kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn test_parse_wallet_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_wallet_id(&id.to_string()).unwrap(), id);

        let err = parse_wallet_id("not-a-uuid").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWalletId);

        let err = parse_wallet_id("00000000-0000-0000-0000-000000000000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWalletId);
    }
}
