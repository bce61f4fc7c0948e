/// Money is represented as integer cents to avoid floating-point precision issues.
/// For EUR/USD, 1 unit = 100 cents, so €50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Add a deposit to a balance, refusing to wrap around on overflow.
pub fn credit(balance: Cents, amount: Cents) -> Option<Cents> {
    balance.checked_add(amount)
}

/// Subtract a withdrawal from a balance.
/// Returns `None` when the balance does not cover the amount.
pub fn debit(balance: Cents, amount: Cents) -> Option<Cents> {
    if balance < amount {
        return None;
    }
    balance.checked_sub(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1), "-0.01");
        assert_eq!(format_cents(i64::MIN), "-92233720368547758.08");
    }

    #[test]
    fn test_credit() {
        assert_eq!(credit(0, 500), Some(500));
        assert_eq!(credit(i64::MAX, 1), None);
    }

    #[test]
    fn test_debit() {
        assert_eq!(debit(500, 200), Some(300));
        assert_eq!(debit(300, 300), Some(0));
        assert_eq!(debit(300, 9999), None);
    }
}
