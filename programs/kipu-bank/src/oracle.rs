use anchor_lang::prelude::*;

use crate::{constants::MAX_PRICE_DECIMALS, error::BankError, state::PriceFeed};

/// USD price of one whole unit of an asset, scaled by 10^decimals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UsdPrice {
    pub answer: u64,
    pub decimals: u8,
}

/// Source of USD prices for ledger valuations.
pub trait PriceOracle {
    /// Read the current price of `asset`. Fails with `OracleUnavailable`
    /// when no usable price exists.
    fn read_price(&self, asset: &Pubkey) -> Result<UsdPrice>;
}

/// Reads a `PriceFeed` account as seen at `now`.
pub struct FeedReader<'a> {
    feed: &'a PriceFeed,
    now: i64,
    max_age: u64,
}

impl<'a> FeedReader<'a> {
    pub fn new(feed: &'a PriceFeed, now: i64, max_age: u64) -> Self {
        Self { feed, now, max_age }
    }
}

impl PriceOracle for FeedReader<'_> {
    fn read_price(&self, asset: &Pubkey) -> Result<UsdPrice> {
        let feed = self.feed;

        require_keys_eq!(feed.asset, *asset, BankError::OracleUnavailable);
        require!(feed.updated_at > 0, BankError::OracleUnavailable);
        require!(feed.answer > 0, BankError::OracleUnavailable);
        require!(
            feed.decimals <= MAX_PRICE_DECIMALS,
            BankError::OracleUnavailable
        );

        // Updates stamped in the future are treated as fresh
        let age = self.now.saturating_sub(feed.updated_at).max(0) as u64;
        require!(age <= self.max_age, BankError::OracleUnavailable);

        Ok(UsdPrice {
            answer: feed.answer as u64,
            decimals: feed.decimals,
        })
    }
}
