use anchor_lang::prelude::*;

#[error_code]
pub enum BankError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Deposit would push the bank over its USD cap")]
    CapExceeded,

    #[msg("Price feed could not be read")]
    OracleUnavailable,

    #[msg("Insufficient vault balance")]
    InsufficientBalance,

    #[msg("Bank is paused")]
    BankPaused,

    #[msg("Bank is not paused")]
    BankNotPaused,

    #[msg("Unauthorized - caller is not bank authority")]
    Unauthorized,

    #[msg("Accounts do not match the requested asset")]
    AssetMismatch,

    #[msg("Price feed does not quote this asset")]
    InvalidPriceFeed,

    #[msg("Asset decimals must be <= 18")]
    InvalidAssetDecimals,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Mints with transfer fees are not supported")]
    UnsupportedMint,
}
