use anchor_lang::prelude::*;

use crate::{
    constants::{ASSET_SEED, BANK_SEED, NATIVE_ASSET, NATIVE_DECIMALS},
    error::BankError,
    events::BankInitialized,
    state::{AssetConfig, Bank, PriceFeed},
};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = Bank::LEN,
        seeds = [BANK_SEED, authority.key().as_ref()],
        bump
    )]
    pub bank: Account<'info, Bank>,

    #[account(
        init,
        payer = authority,
        space = AssetConfig::LEN,
        seeds = [ASSET_SEED, bank.key().as_ref(), NATIVE_ASSET.as_ref()],
        bump
    )]
    pub native_asset: Account<'info, AssetConfig>,

    /// Price feed reference for the native asset
    #[account(
        constraint = price_feed.asset == NATIVE_ASSET @ BankError::InvalidPriceFeed,
    )]
    pub price_feed: Account<'info, PriceFeed>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, bank_cap_usd: u64, max_price_age: u64) -> Result<()> {
    require!(bank_cap_usd > 0, BankError::InvalidAmount);
    require!(max_price_age > 0, BankError::InvalidAmount);

    let bank_key = ctx.accounts.bank.key();
    let price_feed = ctx.accounts.price_feed.key();

    let bank = &mut ctx.accounts.bank;
    bank.creator = ctx.accounts.authority.key();
    bank.authority = ctx.accounts.authority.key();
    bank.bank_cap_usd = bank_cap_usd;
    bank.price_feed = price_feed;
    bank.max_price_age = max_price_age;
    bank.total_usd_value = 0;
    bank.paused = false;
    bank.bump = ctx.bumps.bank;
    bank._reserved = [0u8; 64];

    let native_asset = &mut ctx.accounts.native_asset;
    native_asset.bank = bank_key;
    native_asset.asset = NATIVE_ASSET;
    native_asset.decimals = NATIVE_DECIMALS;
    native_asset.price_feed = price_feed;
    native_asset.token_vault = Pubkey::default();
    native_asset.total_holdings = 0;
    native_asset.usd_value = 0;
    native_asset.bump = ctx.bumps.native_asset;

    emit!(BankInitialized {
        bank: bank_key,
        authority: ctx.accounts.authority.key(),
        price_feed,
        bank_cap_usd,
    });

    msg!("Bank initialized with cap {} (USD, 6 decimals)", bank_cap_usd);

    Ok(())
}
