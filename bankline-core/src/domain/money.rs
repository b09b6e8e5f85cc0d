//! Money parsing and the fixed business constants

use rust_decimal::Decimal;

use super::result::{Error, Result};

/// Branch code assigned to every account
pub const BRANCH_CODE: &str = "0001";

/// Maximum number of withdrawals per account in one process lifetime
pub const MAX_WITHDRAWALS: u32 = 3;

/// Maximum amount of a single withdrawal (1000.00)
pub fn withdrawal_limit() -> Decimal {
    Decimal::new(100_000, 2)
}

/// Parse a user-entered amount
///
/// Accepts either `.` or `,` as the decimal separator. The amount must be
/// positive and have at most two fractional digits.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(Error::validation("amount is required"));
    }

    let amount: Decimal = normalized
        .parse()
        .map_err(|_| Error::validation(format!("invalid amount: {}", input.trim())))?;

    ensure_positive(amount)?;
    if amount.normalize().scale() > 2 {
        return Err(Error::validation("amount cannot have more than 2 decimal places"));
    }

    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    Ok(amount)
}

/// Reject zero and negative amounts
pub fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation("amount must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(parse_amount("150.50").unwrap(), Decimal::new(15050, 2));
        assert_eq!(parse_amount(" 150,50 ").unwrap(), Decimal::new(15050, 2));
        assert_eq!(parse_amount("500").unwrap(), Decimal::new(500, 0));
        assert_eq!(parse_amount("1.10").unwrap(), Decimal::new(110, 2));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount(""), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("abc"), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("0"), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("-10"), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("1.005"), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("1.000,00"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_places() {
        assert_eq!(parse_amount("2.500").unwrap(), Decimal::new(250, 2));
    }
}
