//! Error types for the KipuBank deployer

use anchor_lang::prelude::Pubkey;
use solana_client::client_error::ClientError;
use solana_sdk::{instruction::InstructionError, transaction::TransactionError};
use thiserror::Error;

/// Deployer error types
#[derive(Debug, Error)]
pub enum DeployerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid keypair: {0}")]
    Keypair(String),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] Box<ClientError>),

    #[error("Account {0} could not be decoded: {1}")]
    AccountDecode(Pubkey, String),
}

impl From<ClientError> for DeployerError {
    fn from(err: ClientError) -> Self {
        DeployerError::Rpc(Box::new(err))
    }
}

impl DeployerError {
    /// Custom program error code of a failed transaction, if the program
    /// rejected it (including preflight simulation failures)
    pub fn program_error_code(&self) -> Option<u32> {
        let DeployerError::Rpc(err) = self else {
            return None;
        };
        match err.get_transaction_error()? {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for deployer operations
pub type Result<T> = std::result::Result<T, DeployerError>;
