//! KipuBank RPC client
//!
//! Builds program instructions from the program's own account and
//! instruction types, and sends them through the nonblocking RPC client.

use std::path::Path;

use anchor_lang::{
    prelude::Pubkey, solana_program::instruction::Instruction, system_program, AccountDeserialize,
    InstructionData, ToAccountMetas,
};
use kipu_bank::{
    constants::{ASSET_SEED, BANK_SEED, NATIVE_ASSET, PRICE_FEED_SEED, VAULT_SEED},
    state::{Bank, VaultEntry},
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::error::{DeployerError, Result};

/// Bank PDA for a creator
pub fn bank_address(program_id: &Pubkey, creator: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[BANK_SEED, creator.as_ref()], program_id).0
}

/// Asset config PDA of a bank
pub fn asset_address(program_id: &Pubkey, bank: &Pubkey, asset: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[ASSET_SEED, bank.as_ref(), asset.as_ref()], program_id).0
}

/// Vault entry PDA for (depositor, asset)
pub fn vault_entry_address(
    program_id: &Pubkey,
    bank: &Pubkey,
    depositor: &Pubkey,
    asset: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[VAULT_SEED, bank.as_ref(), depositor.as_ref(), asset.as_ref()],
        program_id,
    )
    .0
}

/// Price feed PDA for an updater and asset
pub fn price_feed_address(program_id: &Pubkey, updater: &Pubkey, asset: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[PRICE_FEED_SEED, updater.as_ref(), asset.as_ref()],
        program_id,
    )
    .0
}

/// `initialize(bank_cap_usd, max_price_age)` signed by `authority`
pub fn initialize_ix(
    program_id: &Pubkey,
    authority: &Pubkey,
    price_feed: &Pubkey,
    bank_cap_usd: u64,
    max_price_age: u64,
) -> Instruction {
    let bank = bank_address(program_id, authority);

    Instruction {
        program_id: *program_id,
        accounts: kipu_bank::accounts::Initialize {
            authority: *authority,
            bank,
            native_asset: asset_address(program_id, &bank, &NATIVE_ASSET),
            price_feed: *price_feed,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: kipu_bank::instruction::Initialize {
            bank_cap_usd,
            max_price_age,
        }
        .data(),
    }
}

/// `create_price_feed(asset, decimals)` owned by `updater`
pub fn create_price_feed_ix(
    program_id: &Pubkey,
    updater: &Pubkey,
    asset: &Pubkey,
    decimals: u8,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: kipu_bank::accounts::CreatePriceFeed {
            updater: *updater,
            price_feed: price_feed_address(program_id, updater, asset),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: kipu_bank::instruction::CreatePriceFeed {
            asset: *asset,
            decimals,
        }
        .data(),
    }
}

/// `update_price(answer)` on a feed owned by `updater`
pub fn update_price_ix(
    program_id: &Pubkey,
    updater: &Pubkey,
    price_feed: &Pubkey,
    answer: i64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: kipu_bank::accounts::UpdatePrice {
            updater: *updater,
            price_feed: *price_feed,
        }
        .to_account_metas(None),
        data: kipu_bank::instruction::UpdatePrice { answer }.data(),
    }
}

/// `deposit(NATIVE_ASSET, amount)` of lamports
pub fn deposit_native_ix(
    program_id: &Pubkey,
    bank: &Pubkey,
    price_feed: &Pubkey,
    depositor: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: kipu_bank::accounts::Deposit {
            depositor: *depositor,
            bank: *bank,
            asset_config: asset_address(program_id, bank, &NATIVE_ASSET),
            price_feed: *price_feed,
            vault_entry: vault_entry_address(program_id, bank, depositor, &NATIVE_ASSET),
            mint: None,
            depositor_token_account: None,
            token_vault: None,
            token_program: None,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: kipu_bank::instruction::Deposit {
            asset: NATIVE_ASSET,
            amount,
        }
        .data(),
    }
}

/// `withdraw(NATIVE_ASSET, amount)` of lamports
pub fn withdraw_native_ix(
    program_id: &Pubkey,
    bank: &Pubkey,
    depositor: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: kipu_bank::accounts::Withdraw {
            depositor: *depositor,
            bank: *bank,
            asset_config: asset_address(program_id, bank, &NATIVE_ASSET),
            vault_entry: vault_entry_address(program_id, bank, depositor, &NATIVE_ASSET),
            mint: None,
            depositor_token_account: None,
            token_vault: None,
            token_program: None,
        }
        .to_account_metas(None),
        data: kipu_bank::instruction::Withdraw {
            asset: NATIVE_ASSET,
            amount,
        }
        .data(),
    }
}

/// Read a Solana CLI keypair file (JSON array of 64 bytes)
pub fn read_keypair(path: &Path) -> Result<Keypair> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DeployerError::Keypair(format!("{}: {e}", path.display())))?;
    let bytes: Vec<u8> = serde_json::from_str(&contents)
        .map_err(|e| DeployerError::Keypair(format!("{}: {e}", path.display())))?;
    Keypair::from_bytes(&bytes)
        .map_err(|e| DeployerError::Keypair(format!("{}: {e}", path.display())))
}

/// Client for a deployed KipuBank program
pub struct BankClient {
    rpc: RpcClient,
    program_id: Pubkey,
}

impl BankClient {
    pub fn new(rpc_url: &str, program_id: Pubkey) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed()),
            program_id,
        }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Sign with `signers` (the first pays) and wait for confirmation
    pub async fn send(&self, instructions: &[Instruction], signers: &[&Keypair]) -> Result<Signature> {
        let payer = signers
            .first()
            .ok_or_else(|| DeployerError::Keypair("no signer supplied".to_string()))?;

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            signers,
            blockhash,
        );

        let signature = self.rpc.send_and_confirm_transaction(&transaction).await?;
        debug!(%signature, "Transaction confirmed");
        Ok(signature)
    }

    /// Create a bank owned by `authority` and return its address
    pub async fn deploy(
        &self,
        authority: &Keypair,
        price_feed: &Pubkey,
        bank_cap_usd: u64,
        max_price_age: u64,
    ) -> Result<Pubkey> {
        let ix = initialize_ix(
            &self.program_id,
            &authority.pubkey(),
            price_feed,
            bank_cap_usd,
            max_price_age,
        );
        let signature = self.send(&[ix], &[authority]).await?;

        let bank = bank_address(&self.program_id, &authority.pubkey());
        info!(%bank, %signature, bank_cap_usd, "Bank initialized");
        Ok(bank)
    }

    /// Deposit lamports into the depositor's native vault entry
    pub async fn deposit_native(
        &self,
        bank: &Pubkey,
        price_feed: &Pubkey,
        depositor: &Keypair,
        amount: u64,
    ) -> Result<Signature> {
        let ix = deposit_native_ix(
            &self.program_id,
            bank,
            price_feed,
            &depositor.pubkey(),
            amount,
        );
        self.send(&[ix], &[depositor]).await
    }

    /// Withdraw lamports from the depositor's native vault entry
    pub async fn withdraw_native(
        &self,
        bank: &Pubkey,
        depositor: &Keypair,
        amount: u64,
    ) -> Result<Signature> {
        let ix = withdraw_native_ix(&self.program_id, bank, &depositor.pubkey(), amount);
        self.send(&[ix], &[depositor]).await
    }

    /// Fetch the bank account, if it exists
    pub async fn fetch_bank(&self, bank: &Pubkey) -> Result<Option<Bank>> {
        self.fetch(bank).await
    }

    /// Vault entry balance; zero when the entry was never created
    pub async fn balance_of(&self, bank: &Pubkey, depositor: &Pubkey, asset: &Pubkey) -> Result<u64> {
        let address = vault_entry_address(&self.program_id, bank, depositor, asset);
        let entry: Option<VaultEntry> = self.fetch(&address).await?;
        Ok(entry.map(|entry| entry.balance).unwrap_or_default())
    }

    async fn fetch<T: AccountDeserialize>(&self, address: &Pubkey) -> Result<Option<T>> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?
            .value;

        let Some(account) = account else {
            return Ok(None);
        };

        T::try_deserialize(&mut account.data.as_slice())
            .map(Some)
            .map_err(|e| DeployerError::AccountDecode(*address, e.to_string()))
    }
}
