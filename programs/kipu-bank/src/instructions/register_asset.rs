use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};
use spl_token_2022::{
    extension::{BaseStateWithExtensions, ExtensionType, StateWithExtensions},
    state::Mint as MintState,
};

use crate::{
    constants::{ASSET_SEED, BANK_SEED, MAX_ASSET_DECIMALS},
    error::BankError,
    events::AssetRegistered,
    state::{AssetConfig, Bank, PriceFeed},
};

#[derive(Accounts)]
pub struct RegisterAsset<'info> {
    #[account(
        mut,
        constraint = authority.key() == bank.authority @ BankError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    #[account(
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
    )]
    pub bank: Account<'info, Bank>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(
        constraint = price_feed.asset == mint.key() @ BankError::InvalidPriceFeed,
    )]
    pub price_feed: Account<'info, PriceFeed>,

    #[account(
        init,
        payer = authority,
        space = AssetConfig::LEN,
        seeds = [ASSET_SEED, bank.key().as_ref(), mint.key().as_ref()],
        bump
    )]
    pub asset_config: Account<'info, AssetConfig>,

    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = mint,
        associated_token::authority = bank,
        associated_token::token_program = token_program,
    )]
    pub token_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Accept deposits of an SPL token, valued through its own price feed
pub fn handler(ctx: Context<RegisterAsset>) -> Result<()> {
    let decimals = ctx.accounts.mint.decimals;
    require!(
        decimals <= MAX_ASSET_DECIMALS,
        BankError::InvalidAssetDecimals
    );

    // Custody credits the full amount, so every transfer must arrive in full
    let mint_info = ctx.accounts.mint.to_account_info();
    require!(
        !has_transfer_fee(&mint_info.try_borrow_data()?)?,
        BankError::UnsupportedMint
    );

    let asset_config = &mut ctx.accounts.asset_config;
    asset_config.bank = ctx.accounts.bank.key();
    asset_config.asset = ctx.accounts.mint.key();
    asset_config.decimals = decimals;
    asset_config.price_feed = ctx.accounts.price_feed.key();
    asset_config.token_vault = ctx.accounts.token_vault.key();
    asset_config.total_holdings = 0;
    asset_config.usd_value = 0;
    asset_config.bump = ctx.bumps.asset_config;

    emit!(AssetRegistered {
        bank: asset_config.bank,
        asset: asset_config.asset,
        decimals,
        price_feed: asset_config.price_feed,
    });

    Ok(())
}

/// Whether a Token or Token-2022 mint carries the transfer fee extension
pub fn has_transfer_fee(mint_data: &[u8]) -> Result<bool> {
    let mint = StateWithExtensions::<MintState>::unpack(mint_data)?;
    Ok(mint
        .get_extension_types()?
        .contains(&ExtensionType::TransferFeeConfig))
}
