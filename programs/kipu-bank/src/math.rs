use anchor_lang::prelude::*;

use crate::{constants::USD_DECIMALS, error::BankError};

/// Safe multiplication then division, floor rounding.
///
/// Computes: (value × numerator) / denominator
/// Uses u128 intermediate to prevent overflow.
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, BankError::DivisionByZero);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(BankError::MathOverflow)?;

    let result = product / (denominator as u128);

    require!(result <= u64::MAX as u128, BankError::MathOverflow);
    Ok(result as u64)
}

/// Value `amount` smallest units of an asset in USD (6 decimals), floor rounding.
///
/// Formula: usd = amount × price × 10^6 / (10^asset_decimals × 10^price_decimals)
///
/// The power-of-ten scaling is folded into a single exponent so the
/// intermediate stays within u128 for any u64 amount and price.
pub fn usd_value(amount: u64, price: u64, price_decimals: u8, asset_decimals: u8) -> Result<u64> {
    let product = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(BankError::MathOverflow)?;

    let scale_down = (asset_decimals as i32) + (price_decimals as i32) - (USD_DECIMALS as i32);

    let result = if scale_down >= 0 {
        let divisor = 10u128
            .checked_pow(scale_down as u32)
            .ok_or(BankError::MathOverflow)?;
        product / divisor
    } else {
        let multiplier = 10u128
            .checked_pow((-scale_down) as u32)
            .ok_or(BankError::MathOverflow)?;
        product
            .checked_mul(multiplier)
            .ok_or(BankError::MathOverflow)?
    };

    require!(result <= u64::MAX as u128, BankError::MathOverflow);
    Ok(result as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USD: u64 = 1_000_000;

    #[test]
    fn test_mul_div_floor() {
        // 100 * 3 / 2 = 150
        assert_eq!(mul_div(100, 3, 2).unwrap(), 150);
        // 100 * 1 / 3 = 33 (floor)
        assert_eq!(mul_div(100, 1, 3).unwrap(), 33);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(mul_div(100, 100, 0).is_err());
    }

    #[test]
    fn test_mul_div_result_overflow() {
        assert!(mul_div(u64::MAX, 2, 1).is_err());
    }

    #[test]
    fn test_usd_value_native() {
        // 1 SOL (9 decimals) at $2,000 quoted with 8 decimals
        let value = usd_value(1_000_000_000, 200_000_000_000, 8, 9).unwrap();
        assert_eq!(value, 2_000 * USD);
    }

    #[test]
    fn test_usd_value_eighteen_decimals() {
        // 1 ETH-like unit (18 decimals) at $2,000
        let value = usd_value(1_000_000_000_000_000_000, 200_000_000_000, 8, 18).unwrap();
        assert_eq!(value, 2_000 * USD);
    }

    #[test]
    fn test_usd_value_scales_up_for_few_decimals() {
        // 5 whole units of a 0-decimal asset at $3 quoted with 2 decimals
        let value = usd_value(5, 300, 2, 0).unwrap();
        assert_eq!(value, 15 * USD);
    }

    #[test]
    fn test_usd_value_floor_rounding() {
        // 1 lamport at $2,000 is worth 0.000002 USD
        assert_eq!(usd_value(1, 200_000_000_000, 8, 9).unwrap(), 2);
        // 1 wei at $2,000 rounds down to zero
        assert_eq!(usd_value(1, 200_000_000_000, 8, 18).unwrap(), 0);
    }

    #[test]
    fn test_usd_value_overflow() {
        let result = usd_value(u64::MAX, u64::MAX, 0, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_usd_value_max_values() {
        let result = usd_value(u64::MAX, u64::MAX, 18, 18);
        assert!(result.is_ok());
    }
}
