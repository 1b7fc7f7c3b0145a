//! Pure vault accounting.
//!
//! Deposits and withdrawals are computed here as a [`Staged`] change against
//! copies of the bank, asset and vault entry values. Nothing is written until
//! every check has passed, at which point [`Staged::commit`] applies the whole
//! change at once.

use anchor_lang::prelude::*;

use crate::{
    error::BankError,
    math::{mul_div, usd_value},
    oracle::PriceOracle,
    state::{AssetConfig, Bank, VaultEntry},
};

/// Custody totals of a single asset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AssetPosition {
    pub decimals: u8,
    pub total_holdings: u64,
    pub usd_value: u64,
}

/// Fully validated post-operation state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Staged {
    pub balance: u64,
    pub position: AssetPosition,
    pub total_usd_value: u64,
}

impl Staged {
    pub fn commit(self, bank: &mut Bank, asset_config: &mut AssetConfig, entry: &mut VaultEntry) {
        entry.balance = self.balance;
        asset_config.total_holdings = self.position.total_holdings;
        asset_config.usd_value = self.position.usd_value;
        bank.total_usd_value = self.total_usd_value;
    }
}

/// Stage a deposit of `amount` into a vault entry currently holding `balance`.
///
/// The asset's resulting total holdings are revalued at the oracle's current
/// price and the bank total is rejected if it would exceed `bank_cap_usd`.
pub fn stage_deposit<O: PriceOracle + ?Sized>(
    bank_cap_usd: u64,
    total_usd_value: u64,
    asset: &Pubkey,
    position: AssetPosition,
    balance: u64,
    amount: u64,
    oracle: &O,
) -> Result<Staged> {
    require!(amount > 0, BankError::InvalidAmount);

    let new_balance = balance
        .checked_add(amount)
        .ok_or(BankError::MathOverflow)?;
    let new_holdings = position
        .total_holdings
        .checked_add(amount)
        .ok_or(BankError::MathOverflow)?;

    let price = oracle.read_price(asset)?;

    // Anything that does not fit the valuation range is over any u64 cap
    let new_asset_usd = usd_value(new_holdings, price.answer, price.decimals, position.decimals)
        .map_err(|_| BankError::CapExceeded)?;

    let new_total = (total_usd_value as u128)
        .saturating_sub(position.usd_value as u128)
        .checked_add(new_asset_usd as u128)
        .ok_or(BankError::MathOverflow)?;

    require!(new_total <= bank_cap_usd as u128, BankError::CapExceeded);

    Ok(Staged {
        balance: new_balance,
        position: AssetPosition {
            decimals: position.decimals,
            total_holdings: new_holdings,
            usd_value: new_asset_usd,
        },
        total_usd_value: new_total as u64,
    })
}

/// Stage a withdrawal of `amount` from a vault entry currently holding `balance`.
///
/// No price is read: the asset's USD value shrinks in proportion to the
/// holdings that leave custody.
pub fn stage_withdraw(
    total_usd_value: u64,
    position: AssetPosition,
    balance: u64,
    amount: u64,
) -> Result<Staged> {
    require!(amount > 0, BankError::InvalidAmount);
    require!(amount <= balance, BankError::InsufficientBalance);

    let new_balance = balance - amount;
    let new_holdings = position
        .total_holdings
        .checked_sub(amount)
        .ok_or(BankError::MathOverflow)?;

    let new_asset_usd = if new_holdings == 0 {
        0
    } else {
        mul_div(position.usd_value, new_holdings, position.total_holdings)?
    };

    let released = position.usd_value - new_asset_usd;

    Ok(Staged {
        balance: new_balance,
        position: AssetPosition {
            decimals: position.decimals,
            total_holdings: new_holdings,
            usd_value: new_asset_usd,
        },
        total_usd_value: total_usd_value.saturating_sub(released),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{NATIVE_ASSET, NATIVE_DECIMALS},
        oracle::UsdPrice,
    };

    const USD: u64 = 1_000_000;
    const CAP: u64 = 1_000_000 * USD;
    const SOL: u64 = 1_000_000_000;
    const ETH: u64 = 1_000_000_000_000_000_000;

    struct FixedPrice(u64);

    impl PriceOracle for FixedPrice {
        fn read_price(&self, _asset: &Pubkey) -> Result<UsdPrice> {
            Ok(UsdPrice {
                answer: self.0,
                decimals: 8,
            })
        }
    }

    struct Offline;

    impl PriceOracle for Offline {
        fn read_price(&self, _asset: &Pubkey) -> Result<UsdPrice> {
            err!(BankError::OracleUnavailable)
        }
    }

    fn eth_usd() -> FixedPrice {
        // $2,000 with 8 decimals
        FixedPrice(200_000_000_000)
    }

    fn native() -> AssetPosition {
        AssetPosition {
            decimals: NATIVE_DECIMALS,
            ..Default::default()
        }
    }

    fn assert_bank_err<T: std::fmt::Debug>(result: Result<T>, expected: BankError) {
        assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(expected));
    }

    fn accounts() -> (Bank, AssetConfig, VaultEntry) {
        let bank = Bank {
            creator: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            bank_cap_usd: CAP,
            price_feed: Pubkey::new_unique(),
            max_price_age: 3_600,
            total_usd_value: 0,
            paused: false,
            bump: 255,
            _reserved: [0u8; 64],
        };
        let asset_config = AssetConfig {
            bank: Pubkey::new_unique(),
            asset: NATIVE_ASSET,
            decimals: NATIVE_DECIMALS,
            price_feed: bank.price_feed,
            token_vault: Pubkey::default(),
            total_holdings: 0,
            usd_value: 0,
            bump: 254,
        };
        let entry = VaultEntry {
            bank: asset_config.bank,
            depositor: Pubkey::new_unique(),
            asset: NATIVE_ASSET,
            balance: 0,
            bump: 253,
        };
        (bank, asset_config, entry)
    }

    #[test]
    fn test_deposit_within_cap() {
        let staged = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, SOL, &eth_usd()).unwrap();

        assert_eq!(staged.balance, SOL);
        assert_eq!(staged.position.total_holdings, SOL);
        assert_eq!(staged.position.usd_value, 2_000 * USD);
        assert_eq!(staged.total_usd_value, 2_000 * USD);
    }

    #[test]
    fn test_deposit_eighteen_decimal_unit() {
        let position = AssetPosition {
            decimals: 18,
            ..Default::default()
        };
        let asset = Pubkey::new_unique();
        let staged = stage_deposit(CAP, 0, &asset, position, 0, ETH, &eth_usd()).unwrap();

        assert_eq!(staged.balance, 1_000_000_000_000_000_000);
        assert_eq!(staged.total_usd_value, 2_000 * USD);
    }

    #[test]
    fn test_deposit_over_cap() {
        // 600 units at $2,000 = $1,200,000
        let result = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, 600 * SOL, &eth_usd());
        assert_bank_err(result, BankError::CapExceeded);
    }

    #[test]
    fn test_deposit_exactly_at_cap() {
        // 500 units at $2,000 = $1,000,000
        let staged =
            stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, 500 * SOL, &eth_usd()).unwrap();
        assert_eq!(staged.total_usd_value, CAP);

        let result = stage_deposit(
            CAP,
            staged.total_usd_value,
            &NATIVE_ASSET,
            staged.position,
            staged.balance,
            1,
            &eth_usd(),
        );
        assert_bank_err(result, BankError::CapExceeded);
    }

    #[test]
    fn test_deposit_valuation_overflow_is_over_cap() {
        let position = AssetPosition {
            decimals: 0,
            ..Default::default()
        };
        let result = stage_deposit(
            u64::MAX,
            0,
            &NATIVE_ASSET,
            position,
            0,
            u64::MAX,
            &FixedPrice(u64::MAX),
        );
        assert_bank_err(result, BankError::CapExceeded);
    }

    #[test]
    fn test_deposit_zero_amount() {
        let result = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, 0, &eth_usd());
        assert_bank_err(result, BankError::InvalidAmount);
    }

    #[test]
    fn test_deposit_zero_amount_checked_before_oracle() {
        let result = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, 0, &Offline);
        assert_bank_err(result, BankError::InvalidAmount);
    }

    #[test]
    fn test_deposit_oracle_unavailable() {
        let result = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, SOL, &Offline);
        assert_bank_err(result, BankError::OracleUnavailable);
    }

    #[test]
    fn test_deposit_revalues_existing_holdings() {
        let first = stage_deposit(CAP, 0, &NATIVE_ASSET, native(), 0, 100 * SOL, &eth_usd())
            .unwrap();
        assert_eq!(first.total_usd_value, 200_000 * USD);

        // Price doubles: 101 units are now worth $404,000
        let second = stage_deposit(
            CAP,
            first.total_usd_value,
            &NATIVE_ASSET,
            first.position,
            0,
            SOL,
            &FixedPrice(4_000_0000_0000),
        )
        .unwrap();
        assert_eq!(second.position.usd_value, 404_000 * USD);
        assert_eq!(second.total_usd_value, 404_000 * USD);
        assert_eq!(second.balance, SOL);
    }

    #[test]
    fn test_deposit_counts_other_assets_against_cap() {
        // Another asset already holds $998,000 of the cap
        let other_assets = 998_000 * USD;
        let result = stage_deposit(CAP, other_assets, &NATIVE_ASSET, native(), 0, SOL, &eth_usd());
        assert!(result.is_ok());

        let result = stage_deposit(
            CAP,
            other_assets,
            &NATIVE_ASSET,
            native(),
            0,
            SOL / 2 + SOL,
            &eth_usd(),
        );
        assert_bank_err(result, BankError::CapExceeded);
    }

    #[test]
    fn test_withdraw_insufficient_balance() {
        let position = AssetPosition {
            decimals: NATIVE_DECIMALS,
            total_holdings: 10 * SOL,
            usd_value: 20_000 * USD,
        };
        let result = stage_withdraw(20_000 * USD, position, SOL, SOL + 1);
        assert_bank_err(result, BankError::InsufficientBalance);
    }

    #[test]
    fn test_withdraw_zero_amount() {
        let result = stage_withdraw(0, native(), SOL, 0);
        assert_bank_err(result, BankError::InvalidAmount);
    }

    #[test]
    fn test_withdraw_releases_proportional_value() {
        let position = AssetPosition {
            decimals: NATIVE_DECIMALS,
            total_holdings: 4 * SOL,
            usd_value: 8_000 * USD,
        };
        let staged = stage_withdraw(10_000 * USD, position, 3 * SOL, SOL).unwrap();

        assert_eq!(staged.balance, 2 * SOL);
        assert_eq!(staged.position.total_holdings, 3 * SOL);
        assert_eq!(staged.position.usd_value, 6_000 * USD);
        assert_eq!(staged.total_usd_value, 8_000 * USD);
    }

    #[test]
    fn test_withdraw_everything_clears_value() {
        let position = AssetPosition {
            decimals: NATIVE_DECIMALS,
            total_holdings: 3,
            usd_value: 7,
        };
        let staged = stage_withdraw(7, position, 3, 3).unwrap();
        assert_eq!(staged.balance, 0);
        assert_eq!(staged.position.usd_value, 0);
        assert_eq!(staged.total_usd_value, 0);
    }

    #[test]
    fn test_deposit_then_withdraw_round_trip() {
        let (mut bank, mut asset_config, mut entry) = accounts();

        let staged = stage_deposit(
            bank.bank_cap_usd,
            bank.total_usd_value,
            &asset_config.asset,
            asset_config.position(),
            entry.balance,
            SOL,
            &eth_usd(),
        )
        .unwrap();
        staged.commit(&mut bank, &mut asset_config, &mut entry);
        assert_eq!(entry.balance, SOL);

        let staged = stage_withdraw(
            bank.total_usd_value,
            asset_config.position(),
            entry.balance,
            SOL,
        )
        .unwrap();
        staged.commit(&mut bank, &mut asset_config, &mut entry);

        assert_eq!(entry.balance, 0);
        assert_eq!(asset_config.total_holdings, 0);
        assert_eq!(asset_config.usd_value, 0);
        assert_eq!(bank.total_usd_value, 0);
    }

    #[test]
    fn test_failed_deposit_leaves_accounts_untouched() {
        let (mut bank, mut asset_config, mut entry) = accounts();

        stage_deposit(
            bank.bank_cap_usd,
            bank.total_usd_value,
            &asset_config.asset,
            asset_config.position(),
            entry.balance,
            SOL,
            &eth_usd(),
        )
        .unwrap()
        .commit(&mut bank, &mut asset_config, &mut entry);

        let before = (entry.balance, asset_config.position(), bank.total_usd_value);

        let result = stage_deposit(
            bank.bank_cap_usd,
            bank.total_usd_value,
            &asset_config.asset,
            asset_config.position(),
            entry.balance,
            600 * SOL,
            &eth_usd(),
        );
        assert_bank_err(result, BankError::CapExceeded);

        let after = (entry.balance, asset_config.position(), bank.total_usd_value);
        assert_eq!(before, after);
    }
}
