use anchor_lang::prelude::Pubkey;

pub const BANK_SEED: &[u8] = b"bank";
pub const ASSET_SEED: &[u8] = b"asset";
pub const VAULT_SEED: &[u8] = b"vault";
pub const PRICE_FEED_SEED: &[u8] = b"price_feed";

/// Asset identity of the chain's native currency (lamports).
pub const NATIVE_ASSET: Pubkey = Pubkey::new_from_array([0u8; 32]);
pub const NATIVE_DECIMALS: u8 = 9;

/// Bank cap and all valuations are USD with 6 decimals.
pub const USD_DECIMALS: u8 = 6;

pub const MAX_ASSET_DECIMALS: u8 = 18;
pub const MAX_PRICE_DECIMALS: u8 = 18;
