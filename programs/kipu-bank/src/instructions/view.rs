use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;

use crate::{
    constants::{ASSET_SEED, BANK_SEED, VAULT_SEED},
    error::BankError,
    math::usd_value,
    oracle::{FeedReader, PriceOracle},
    state::{AssetConfig, Bank, PriceFeed, VaultEntry},
};

#[derive(Accounts)]
pub struct BankView<'info> {
    #[account(
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
    )]
    pub bank: Account<'info, Bank>,
}

#[derive(Accounts)]
#[instruction(depositor: Pubkey, asset: Pubkey)]
pub struct BalanceView<'info> {
    #[account(
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
    )]
    pub bank: Account<'info, Bank>,

    /// CHECK: Address is pinned by seeds; may not exist yet
    #[account(
        seeds = [VAULT_SEED, bank.key().as_ref(), depositor.as_ref(), asset.as_ref()],
        bump
    )]
    pub vault_entry: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct AssetView<'info> {
    #[account(
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
    )]
    pub bank: Account<'info, Bank>,

    #[account(
        seeds = [ASSET_SEED, bank.key().as_ref(), asset.as_ref()],
        bump = asset_config.bump,
    )]
    pub asset_config: Account<'info, AssetConfig>,

    #[account(
        constraint = price_feed.key() == asset_config.price_feed @ BankError::InvalidPriceFeed,
    )]
    pub price_feed: Account<'info, PriceFeed>,
}

/// Balance of a vault entry; zero if the entry was never created
pub fn balance_of(ctx: Context<BalanceView>, _depositor: Pubkey, _asset: Pubkey) -> Result<()> {
    let info = ctx.accounts.vault_entry.to_account_info();
    let balance = VaultEntry::load(&info)?.map_or(0, |entry| entry.balance);

    set_return_data(&balance.to_le_bytes());
    Ok(())
}

/// Total USD valuation of custodied assets
pub fn total_value_usd(ctx: Context<BankView>) -> Result<()> {
    set_return_data(&ctx.accounts.bank.total_usd_value.to_le_bytes());
    Ok(())
}

/// USD value that can still be deposited (0 if paused)
pub fn remaining_cap_usd(ctx: Context<BankView>) -> Result<()> {
    set_return_data(&ctx.accounts.bank.remaining_cap_usd().to_le_bytes());
    Ok(())
}

/// USD value of `amount` of `asset` at the current price
pub fn preview_deposit_value(ctx: Context<AssetView>, asset: Pubkey, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let oracle = FeedReader::new(
        &ctx.accounts.price_feed,
        now,
        ctx.accounts.bank.max_price_age,
    );
    let price = oracle.read_price(&asset)?;

    let value = usd_value(
        amount,
        price.answer,
        price.decimals,
        ctx.accounts.asset_config.decimals,
    )?;

    set_return_data(&value.to_le_bytes());
    Ok(())
}
