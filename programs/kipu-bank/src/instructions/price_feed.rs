use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_PRICE_DECIMALS, PRICE_FEED_SEED},
    error::BankError,
    events::{PriceFeedCreated, PriceUpdated},
    state::PriceFeed,
};

#[derive(Accounts)]
#[instruction(asset: Pubkey)]
pub struct CreatePriceFeed<'info> {
    #[account(mut)]
    pub updater: Signer<'info>,

    #[account(
        init,
        payer = updater,
        space = PriceFeed::LEN,
        seeds = [PRICE_FEED_SEED, updater.key().as_ref(), asset.as_ref()],
        bump
    )]
    pub price_feed: Account<'info, PriceFeed>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdatePrice<'info> {
    pub updater: Signer<'info>,

    #[account(
        mut,
        has_one = updater @ BankError::Unauthorized,
    )]
    pub price_feed: Account<'info, PriceFeed>,
}

pub fn create(ctx: Context<CreatePriceFeed>, asset: Pubkey, decimals: u8) -> Result<()> {
    require!(decimals <= MAX_PRICE_DECIMALS, BankError::InvalidPriceFeed);

    let price_feed = &mut ctx.accounts.price_feed;
    price_feed.updater = ctx.accounts.updater.key();
    price_feed.asset = asset;
    price_feed.answer = 0;
    price_feed.decimals = decimals;
    price_feed.updated_at = 0;
    price_feed.bump = ctx.bumps.price_feed;

    emit!(PriceFeedCreated {
        price_feed: price_feed.key(),
        updater: price_feed.updater,
        asset,
        decimals,
    });

    Ok(())
}

/// Publish a new USD price, stamped with the current cluster time
pub fn update(ctx: Context<UpdatePrice>, answer: i64) -> Result<()> {
    require!(answer > 0, BankError::InvalidAmount);

    let now = Clock::get()?.unix_timestamp;

    let price_feed = &mut ctx.accounts.price_feed;
    price_feed.answer = answer;
    price_feed.updated_at = now;

    emit!(PriceUpdated {
        price_feed: price_feed.key(),
        answer,
        updated_at: now,
    });

    Ok(())
}
