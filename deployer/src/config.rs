//! Deployer configuration, read from the environment

use std::path::PathBuf;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;

use crate::error::{DeployerError, Result};

/// $1,000,000 with 6 decimals
pub const DEFAULT_BANK_CAP_USD: u64 = 1_000_000 * 1_000_000;
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 3_600;
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Configuration for a bank deployment
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the target cluster
    pub rpc_url: String,

    /// Solana CLI keypair file (JSON byte array) of the deploying signer
    pub keypair_path: PathBuf,

    /// Address of the deployed KipuBank program
    pub program_id: Pubkey,

    /// Bank cap in USD with 6 decimals
    pub bank_cap_usd: u64,

    /// Native asset price feed reference
    pub price_feed: Option<Pubkey>,

    /// Maximum accepted price age in seconds
    pub max_price_age_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = lookup("KIPU_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let keypair_path = lookup("KIPU_KEYPAIR")
            .map(PathBuf::from)
            .or_else(|| {
                lookup("HOME").map(|home| PathBuf::from(home).join(".config/solana/id.json"))
            })
            .ok_or_else(|| DeployerError::Config("KIPU_KEYPAIR is not set".to_string()))?;

        let program_id = match lookup("KIPU_PROGRAM_ID") {
            Some(value) => parse_pubkey("KIPU_PROGRAM_ID", &value)?,
            None => kipu_bank::ID,
        };

        let bank_cap_usd = match lookup("KIPU_BANK_CAP_USD") {
            Some(value) => parse_u64("KIPU_BANK_CAP_USD", &value)?,
            None => DEFAULT_BANK_CAP_USD,
        };
        if bank_cap_usd == 0 {
            return Err(DeployerError::Config(
                "KIPU_BANK_CAP_USD must be greater than zero".to_string(),
            ));
        }

        let price_feed = lookup("KIPU_PRICE_FEED")
            .map(|value| parse_pubkey("KIPU_PRICE_FEED", &value))
            .transpose()?;

        let max_price_age_secs = match lookup("KIPU_MAX_PRICE_AGE_SECS") {
            Some(value) => parse_u64("KIPU_MAX_PRICE_AGE_SECS", &value)?,
            None => DEFAULT_MAX_PRICE_AGE_SECS,
        };

        Ok(Self {
            rpc_url,
            keypair_path,
            program_id,
            bank_cap_usd,
            price_feed,
            max_price_age_secs,
        })
    }

    /// Price feed reference, required to deploy
    pub fn require_price_feed(&self) -> Result<Pubkey> {
        self.price_feed
            .ok_or_else(|| DeployerError::Config("KIPU_PRICE_FEED is not set".to_string()))
    }
}

fn parse_pubkey(key: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| DeployerError::Config(format!("{key} is not a valid address: {e}")))
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|e| DeployerError::Config(format!("{key} is not a valid integer: {e}")))
}
