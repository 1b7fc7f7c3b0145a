use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod state;

use instructions::*;

declare_id!("22okp3ZHJBupsvWMXj3hP3BBHWuvHeNgXCaNskYmpW3N");

#[program]
pub mod kipu_bank {
    use super::*;

    /// Create a bank with a USD cap (6 decimals) and the native asset's price feed
    pub fn initialize(ctx: Context<Initialize>, bank_cap_usd: u64, max_price_age: u64) -> Result<()> {
        instructions::initialize::handler(ctx, bank_cap_usd, max_price_age)
    }

    /// Deposit `amount` of `asset` (NATIVE_ASSET for lamports)
    /// Fails with CapExceeded if the bank's USD valuation would exceed its cap
    pub fn deposit(ctx: Context<Deposit>, asset: Pubkey, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, asset, amount)
    }

    /// Withdraw `amount` of `asset` back to the depositor
    pub fn withdraw(ctx: Context<Withdraw>, asset: Pubkey, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, asset, amount)
    }

    /// Accept an SPL token valued through its own price feed
    pub fn register_asset(ctx: Context<RegisterAsset>) -> Result<()> {
        instructions::register_asset::handler(ctx)
    }

    /// Pause deposits and withdrawals (emergency)
    pub fn pause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    /// Unpause bank operations
    pub fn unpause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    /// Transfer bank authority
    pub fn transfer_authority(ctx: Context<Admin>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority(ctx, new_authority)
    }

    // ============ Price Feeds ============

    /// Create a USD price feed for `asset`, owned by the signer
    pub fn create_price_feed(
        ctx: Context<CreatePriceFeed>,
        asset: Pubkey,
        decimals: u8,
    ) -> Result<()> {
        instructions::price_feed::create(ctx, asset, decimals)
    }

    /// Publish a new price (updater only)
    pub fn update_price(ctx: Context<UpdatePrice>, answer: i64) -> Result<()> {
        instructions::price_feed::update(ctx, answer)
    }

    // ============ View Functions (CPI composable) ============

    /// Vault entry balance for (depositor, asset)
    pub fn balance_of(ctx: Context<BalanceView>, depositor: Pubkey, asset: Pubkey) -> Result<()> {
        instructions::view::balance_of(ctx, depositor, asset)
    }

    /// Total USD valuation held by the bank
    pub fn total_value_usd(ctx: Context<BankView>) -> Result<()> {
        instructions::view::total_value_usd(ctx)
    }

    /// USD headroom under the cap (0 if paused)
    pub fn remaining_cap_usd(ctx: Context<BankView>) -> Result<()> {
        instructions::view::remaining_cap_usd(ctx)
    }

    /// USD value of an amount at the current price
    pub fn preview_deposit_value(
        ctx: Context<AssetView>,
        asset: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::view::preview_deposit_value(ctx, asset, amount)
    }
}
