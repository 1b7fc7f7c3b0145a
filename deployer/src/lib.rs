//! KipuBank Deployer
//!
//! Deploys a KipuBank vault ledger (bank cap + price feed reference) and
//! provides a typed client for its native-asset deposit flow.

pub mod client;
pub mod config;
pub mod error;

pub use client::BankClient;
pub use config::Config;
pub use error::{DeployerError, Result};
