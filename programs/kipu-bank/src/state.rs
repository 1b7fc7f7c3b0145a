use anchor_lang::prelude::*;

use crate::{
    constants::{ASSET_SEED, BANK_SEED, NATIVE_ASSET, PRICE_FEED_SEED, VAULT_SEED},
    ledger::AssetPosition,
};

#[account]
pub struct Bank {
    /// Signer that created the bank; part of the PDA seeds
    pub creator: Pubkey,
    /// Admin who can pause/unpause, register assets and transfer authority
    pub authority: Pubkey,
    /// Maximum total USD valuation of custodied assets (6 decimals)
    pub bank_cap_usd: u64,
    /// Price feed reference for the native asset
    pub price_feed: Pubkey,
    /// Maximum accepted age of a price update, in seconds
    pub max_price_age: u64,
    /// Sum of every asset's `usd_value`
    pub total_usd_value: u64,
    /// Emergency pause flag
    pub paused: bool,
    /// PDA bump seed
    pub bump: u8,
    /// Reserved for future upgrades
    pub _reserved: [u8; 64],
}

impl Bank {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // creator
        32 +  // authority
        8 +   // bank_cap_usd
        32 +  // price_feed
        8 +   // max_price_age
        8 +   // total_usd_value
        1 +   // paused
        1 +   // bump
        64; // _reserved

    pub const SEED_PREFIX: &'static [u8] = BANK_SEED;

    pub fn remaining_cap_usd(&self) -> u64 {
        if self.paused {
            return 0;
        }
        self.bank_cap_usd.saturating_sub(self.total_usd_value)
    }
}

#[account]
pub struct AssetConfig {
    /// Owning bank
    pub bank: Pubkey,
    /// Token mint, or `NATIVE_ASSET` for lamports
    pub asset: Pubkey,
    /// Decimals of the asset's smallest unit
    pub decimals: u8,
    /// USD price feed for this asset
    pub price_feed: Pubkey,
    /// Bank-owned custody token account (default key for the native asset)
    pub token_vault: Pubkey,
    /// Sum of all vault entry balances for this asset
    pub total_holdings: u64,
    /// USD valuation of `total_holdings` at the last price read (6 decimals)
    pub usd_value: u64,
    /// PDA bump seed
    pub bump: u8,
}

impl AssetConfig {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // bank
        32 +  // asset
        1 +   // decimals
        32 +  // price_feed
        32 +  // token_vault
        8 +   // total_holdings
        8 +   // usd_value
        1; // bump

    pub const SEED_PREFIX: &'static [u8] = ASSET_SEED;

    pub fn is_native(&self) -> bool {
        self.asset == NATIVE_ASSET
    }

    pub fn position(&self) -> AssetPosition {
        AssetPosition {
            decimals: self.decimals,
            total_holdings: self.total_holdings,
            usd_value: self.usd_value,
        }
    }
}

/// Per-(depositor, asset) custodial balance.
#[account]
pub struct VaultEntry {
    pub bank: Pubkey,
    pub depositor: Pubkey,
    pub asset: Pubkey,
    /// Balance in the asset's smallest unit
    pub balance: u64,
    pub bump: u8,
}

impl VaultEntry {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // bank
        32 +  // depositor
        32 +  // asset
        8 +   // balance
        1; // bump

    pub const SEED_PREFIX: &'static [u8] = VAULT_SEED;

    /// Read an entry whose PDA may not be allocated yet.
    ///
    /// Returns `None` until the first deposit creates the account.
    pub fn load(info: &AccountInfo) -> Result<Option<Self>> {
        if info.data_is_empty() || info.owner != &crate::ID {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        Ok(Some(Self::try_deserialize(&mut &data[..])?))
    }

    /// Write the entry back into its account data
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data;
        self.try_serialize(&mut writer)
    }
}

/// USD price quote maintained by an updater.
#[account]
pub struct PriceFeed {
    /// Only signer allowed to push prices
    pub updater: Pubkey,
    /// Asset being quoted
    pub asset: Pubkey,
    /// Latest USD price, scaled by 10^decimals
    pub answer: i64,
    pub decimals: u8,
    /// Unix timestamp of the latest update (0 = never updated)
    pub updated_at: i64,
    pub bump: u8,
}

impl PriceFeed {
    pub const LEN: usize = 8 +  // discriminator
        32 +  // updater
        32 +  // asset
        8 +   // answer
        1 +   // decimals
        8 +   // updated_at
        1; // bump

    pub const SEED_PREFIX: &'static [u8] = PRICE_FEED_SEED;
}
