use anchor_lang::prelude::*;

use crate::{
    constants::BANK_SEED,
    error::BankError,
    events::{AuthorityTransferred, BankStatusChanged},
    state::Bank,
};

#[derive(Accounts)]
pub struct Admin<'info> {
    #[account(
        constraint = authority.key() == bank.authority @ BankError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [BANK_SEED, bank.creator.as_ref()],
        bump = bank.bump,
    )]
    pub bank: Account<'info, Bank>,
}

/// Pause deposits and withdrawals (emergency circuit breaker)
pub fn pause(ctx: Context<Admin>) -> Result<()> {
    let bank = &mut ctx.accounts.bank;

    require!(!bank.paused, BankError::BankPaused);

    bank.paused = true;

    emit!(BankStatusChanged {
        bank: bank.key(),
        paused: true,
    });

    Ok(())
}

/// Resume deposits and withdrawals
pub fn unpause(ctx: Context<Admin>) -> Result<()> {
    let bank = &mut ctx.accounts.bank;

    require!(bank.paused, BankError::BankNotPaused);

    bank.paused = false;

    emit!(BankStatusChanged {
        bank: bank.key(),
        paused: false,
    });

    Ok(())
}

/// Hand bank administration to a new address
pub fn transfer_authority(ctx: Context<Admin>, new_authority: Pubkey) -> Result<()> {
    let bank = &mut ctx.accounts.bank;
    let previous_authority = bank.authority;

    bank.authority = new_authority;

    emit!(AuthorityTransferred {
        bank: bank.key(),
        previous_authority,
        new_authority,
    });

    Ok(())
}
