use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::{
    constants::{ASSET_SEED, BANK_SEED, VAULT_SEED},
    error::BankError,
    events::Withdraw as WithdrawEvent,
    ledger::stage_withdraw,
    state::{AssetConfig, Bank, VaultEntry},
};

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct Withdraw<'info> {
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

    /// CHECK: Address is pinned by seeds; an unallocated entry reads as balance 0
    #[account(
        mut,
        seeds = [VAULT_SEED, bank.key().as_ref(), depositor.key().as_ref(), asset.as_ref()],
        bump
    )]
    pub vault_entry: UncheckedAccount<'info>,

    /// Token accounts, only required for non-native assets
    pub mint: Option<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub depositor_token_account: Option<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault: Option<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Option<Interface<'info, TokenInterface>>,
}

/// Withdraw `amount` of `asset` from the caller's vault entry back to the caller
pub fn handler(mut ctx: Context<Withdraw>, asset: Pubkey, amount: u64) -> Result<()> {
    let entry_info = ctx.accounts.vault_entry.to_account_info();
    let entry = VaultEntry::load(&entry_info)?;

    let staged = stage_withdraw(
        ctx.accounts.bank.total_usd_value,
        ctx.accounts.asset_config.position(),
        entry.as_ref().map_or(0, |entry| entry.balance),
        amount,
    )?;
    // A successful stage implies a non-zero balance, so the entry exists
    let Some(mut entry) = entry else {
        return err!(BankError::InsufficientBalance);
    };

    if ctx.accounts.asset_config.is_native() {
        // The bank account is program-owned, so lamports move directly
        let bank_info = ctx.accounts.bank.to_account_info();
        let depositor_info = ctx.accounts.depositor.to_account_info();

        let bank_lamports = bank_info
            .lamports()
            .checked_sub(amount)
            .ok_or(BankError::InsufficientBalance)?;
        let depositor_lamports = depositor_info
            .lamports()
            .checked_add(amount)
            .ok_or(BankError::MathOverflow)?;

        **bank_info.try_borrow_mut_lamports()? = bank_lamports;
        **depositor_info.try_borrow_mut_lamports()? = depositor_lamports;
    } else {
        let (Some(mint), Some(to), Some(token_vault), Some(token_program)) = (
            ctx.accounts.mint.as_ref(),
            ctx.accounts.depositor_token_account.as_ref(),
            ctx.accounts.token_vault.as_ref(),
            ctx.accounts.token_program.as_ref(),
        ) else {
            return err!(BankError::AssetMismatch);
        };

        require_keys_eq!(mint.key(), asset, BankError::AssetMismatch);
        require_keys_eq!(to.mint, asset, BankError::AssetMismatch);
        require_keys_eq!(
            to.owner,
            ctx.accounts.depositor.key(),
            BankError::AssetMismatch
        );
        require_keys_eq!(
            token_vault.key(),
            ctx.accounts.asset_config.token_vault,
            BankError::AssetMismatch
        );

        let creator = ctx.accounts.bank.creator;
        let bump = ctx.accounts.bank.bump;
        let signer_seeds: &[&[&[u8]]] = &[&[BANK_SEED, creator.as_ref(), &[bump]]];

        transfer_checked(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                TransferChecked {
                    from: token_vault.to_account_info(),
                    to: to.to_account_info(),
                    mint: mint.to_account_info(),
                    authority: ctx.accounts.bank.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            mint.decimals,
        )?;
    }

    let accounts = &mut ctx.accounts;
    staged.commit(&mut accounts.bank, &mut accounts.asset_config, &mut entry);
    entry.store(&entry_info)?;

    emit!(WithdrawEvent {
        bank: accounts.bank.key(),
        asset,
        depositor: accounts.depositor.key(),
        amount,
        new_balance: staged.balance,
        total_usd_value: staged.total_usd_value,
    });

    Ok(())
}
