use anchor_lang::prelude::*;

#[event]
pub struct BankInitialized {
    pub bank: Pubkey,
    pub authority: Pubkey,
    pub price_feed: Pubkey,
    pub bank_cap_usd: u64,
}

#[event]
pub struct AssetRegistered {
    pub bank: Pubkey,
    pub asset: Pubkey,
    pub decimals: u8,
    pub price_feed: Pubkey,
}

#[event]
pub struct Deposit {
    pub bank: Pubkey,
    pub asset: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub new_balance: u64,
    pub total_usd_value: u64,
}

#[event]
pub struct Withdraw {
    pub bank: Pubkey,
    pub asset: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub new_balance: u64,
    pub total_usd_value: u64,
}

#[event]
pub struct BankStatusChanged {
    pub bank: Pubkey,
    pub paused: bool,
}

#[event]
pub struct AuthorityTransferred {
    pub bank: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}

#[event]
pub struct PriceFeedCreated {
    pub price_feed: Pubkey,
    pub updater: Pubkey,
    pub asset: Pubkey,
    pub decimals: u8,
}

#[event]
pub struct PriceUpdated {
    pub price_feed: Pubkey,
    pub answer: i64,
    pub updated_at: i64,
}
