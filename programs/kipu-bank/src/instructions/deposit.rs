use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::{
    constants::{ASSET_SEED, BANK_SEED, VAULT_SEED},
    error::BankError,
    events::Deposit as DepositEvent,
    ledger::stage_deposit,
    oracle::FeedReader,
    state::{AssetConfig, Bank, PriceFeed, VaultEntry},
};

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
        constraint = !bank.paused @ BankError::BankPaused,
    )]
    pub bank: Account<'info, Bank>,

    #[account(
        mut,
        seeds = [ASSET_SEED, bank.key().as_ref(), asset.as_ref()],
        bump = asset_config.bump,
    )]
    pub asset_config: Account<'info, AssetConfig>,

    #[account(
        constraint = price_feed.key() == asset_config.price_feed @ BankError::InvalidPriceFeed,
    )]
    pub price_feed: Account<'info, PriceFeed>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = VaultEntry::LEN,
        seeds = [VAULT_SEED, bank.key().as_ref(), depositor.key().as_ref(), asset.as_ref()],
        bump
    )]
    pub vault_entry: Account<'info, VaultEntry>,

    /// Token accounts, only required for non-native assets
    pub mint: Option<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub depositor_token_account: Option<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault: Option<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Option<Interface<'info, TokenInterface>>,
    pub system_program: Program<'info, System>,
}

/// Deposit `amount` of `asset` into the caller's vault entry.
///
/// The post-deposit valuation is checked against the bank cap before any
/// funds move; the whole instruction reverts on any failure.
pub fn handler(mut ctx: Context<Deposit>, asset: Pubkey, amount: u64) -> Result<()> {
    require!(amount > 0, BankError::InvalidAmount);

    let now = Clock::get()?.unix_timestamp;
    let bank = &ctx.accounts.bank;
    let oracle = FeedReader::new(&ctx.accounts.price_feed, now, bank.max_price_age);

    let staged = stage_deposit(
        bank.bank_cap_usd,
        bank.total_usd_value,
        &asset,
        ctx.accounts.asset_config.position(),
        ctx.accounts.vault_entry.balance,
        amount,
        &oracle,
    )?;

    if ctx.accounts.asset_config.is_native() {
        // Lamports are custodied on the bank account itself
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor.to_account_info(),
                    to: ctx.accounts.bank.to_account_info(),
                },
            ),
            amount,
        )?;
    } else {
        let (Some(mint), Some(from), Some(token_vault), Some(token_program)) = (
            ctx.accounts.mint.as_ref(),
            ctx.accounts.depositor_token_account.as_ref(),
            ctx.accounts.token_vault.as_ref(),
            ctx.accounts.token_program.as_ref(),
        ) else {
            return err!(BankError::AssetMismatch);
        };

        require_keys_eq!(mint.key(), asset, BankError::AssetMismatch);
        require_keys_eq!(from.mint, asset, BankError::AssetMismatch);
        require_keys_eq!(
            from.owner,
            ctx.accounts.depositor.key(),
            BankError::AssetMismatch
        );
        require_keys_eq!(
            token_vault.key(),
            ctx.accounts.asset_config.token_vault,
            BankError::AssetMismatch
        );

        transfer_checked(
            CpiContext::new(
                token_program.to_account_info(),
                TransferChecked {
                    from: from.to_account_info(),
                    to: token_vault.to_account_info(),
                    mint: mint.to_account_info(),
                    authority: ctx.accounts.depositor.to_account_info(),
                },
            ),
            amount,
            mint.decimals,
        )?;
    }

    let bank_key = ctx.accounts.bank.key();
    let depositor = ctx.accounts.depositor.key();

    let accounts = &mut ctx.accounts;
    accounts.vault_entry.bank = bank_key;
    accounts.vault_entry.depositor = depositor;
    accounts.vault_entry.asset = asset;
    accounts.vault_entry.bump = ctx.bumps.vault_entry;

    staged.commit(
        &mut accounts.bank,
        &mut accounts.asset_config,
        &mut accounts.vault_entry,
    );

    emit!(DepositEvent {
        bank: bank_key,
        asset,
        depositor,
        amount,
        new_balance: staged.balance,
        total_usd_value: staged.total_usd_value,
    });

    Ok(())
}
