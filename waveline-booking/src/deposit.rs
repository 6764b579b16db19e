/// Minimum share of the ticket price accepted as a reservation deposit.
pub const MIN_DEPOSIT_PERCENT: u8 = 10;
pub const MAX_DEPOSIT_PERCENT: u8 = 100;
pub const DEFAULT_DEPOSIT_PERCENT: u8 = 20;

/// Deposit owed for a reservation at the given percentage of the sailing
/// price. Fractions of a cent are truncated.
pub fn deposit_amount(price_cents: i64, percent: u8) -> Result<i64, DepositError> {
    if !(MIN_DEPOSIT_PERCENT..=MAX_DEPOSIT_PERCENT).contains(&percent) {
        return Err(DepositError::PercentOutOfRange {
            percent,
            min: MIN_DEPOSIT_PERCENT,
            max: MAX_DEPOSIT_PERCENT,
        });
    }
    Ok(price_cents * percent as i64 / 100)
}

#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    #[error("Deposit must be between {min}% and {max}% of the ticket price, got {percent}%")]
    PercentOutOfRange { percent: u8, min: u8, max: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deposit_is_a_fifth_of_the_price() {
        assert_eq!(deposit_amount(150_00, DEFAULT_DEPOSIT_PERCENT).unwrap(), 30_00);
    }

    #[test]
    fn test_full_prepayment_is_allowed() {
        assert_eq!(deposit_amount(150_00, 100).unwrap(), 150_00);
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(deposit_amount(150_00, 10).unwrap(), 15_00);
        assert!(matches!(
            deposit_amount(150_00, 9),
            Err(DepositError::PercentOutOfRange { percent: 9, .. })
        ));
        assert!(deposit_amount(150_00, 101).is_err());
    }

    #[test]
    fn test_sub_cent_fractions_truncate() {
        // 33% of 99 cents is 32.67 cents.
        assert_eq!(deposit_amount(99, 33).unwrap(), 32);
    }
}
