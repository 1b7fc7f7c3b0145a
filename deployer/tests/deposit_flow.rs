//! End-to-end deposit flow against a running validator.
//!
//! Requires the program deployed at `kipu_bank::ID` on `KIPU_RPC_URL`
//! (default localhost), e.g. via `solana-test-validator --bpf-program`.
//! Run with `cargo test -- --ignored`.

use anchor_lang::{error::ERROR_CODE_OFFSET, prelude::Pubkey};
use kipu_bank::{constants::NATIVE_ASSET, error::BankError};
use kipu_bank_deployer::{
    client::{create_price_feed_ix, price_feed_address, update_price_ix},
    config::{DEFAULT_BANK_CAP_USD, DEFAULT_RPC_URL},
    BankClient, Result,
};
use solana_sdk::signature::{Keypair, Signature, Signer};

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
/// $2,000 with 8 decimals
const SOL_USD: i64 = 200_000_000_000;

/// Assert the transaction was rejected by the program with `expected`
fn assert_bank_error(result: Result<Signature>, expected: BankError) {
    let err = result.expect_err("transaction should fail");
    assert_eq!(
        err.program_error_code(),
        Some(ERROR_CODE_OFFSET + expected as u32),
        "unexpected failure: {err}"
    );
}

async fn funded(client: &BankClient, lamports: u64) -> Keypair {
    let keypair = Keypair::new();
    let signature = client
        .rpc()
        .request_airdrop(&keypair.pubkey(), lamports)
        .await
        .expect("airdrop");
    client
        .rpc()
        .poll_for_signature(&signature)
        .await
        .expect("airdrop confirmation");
    keypair
}

struct Deployment {
    client: BankClient,
    bank: Pubkey,
    price_feed: Pubkey,
}

async fn deploy() -> Deployment {
    let rpc_url = std::env::var("KIPU_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
    let client = BankClient::new(&rpc_url, kipu_bank::ID);
    let program_id = client.program_id();

    let deployer = funded(&client, 10 * LAMPORTS_PER_SOL).await;
    let price_feed = price_feed_address(&program_id, &deployer.pubkey(), &NATIVE_ASSET);

    client
        .send(
            &[
                create_price_feed_ix(&program_id, &deployer.pubkey(), &NATIVE_ASSET, 8),
                update_price_ix(&program_id, &deployer.pubkey(), &price_feed, SOL_USD),
            ],
            &[&deployer],
        )
        .await
        .expect("price feed");

    let bank = client
        .deploy(&deployer, &price_feed, DEFAULT_BANK_CAP_USD, 3_600)
        .await
        .expect("deploy");

    Deployment {
        client,
        bank,
        price_feed,
    }
}

#[tokio::test]
#[ignore = "requires a local validator with kipu-bank deployed"]
async fn test_native_deposit_updates_balance() {
    let Deployment {
        client,
        bank,
        price_feed,
    } = deploy().await;
    let user = funded(&client, 2 * LAMPORTS_PER_SOL).await;

    let deposit = LAMPORTS_PER_SOL;
    client
        .deposit_native(&bank, &price_feed, &user, deposit)
        .await
        .expect("deposit");

    let balance = client
        .balance_of(&bank, &user.pubkey(), &NATIVE_ASSET)
        .await
        .unwrap();
    assert_eq!(balance, deposit);

    let state = client.fetch_bank(&bank).await.unwrap().expect("bank account");
    assert_eq!(state.total_usd_value, 2_000 * 1_000_000);
}

#[tokio::test]
#[ignore = "requires a local validator with kipu-bank deployed"]
async fn test_deposit_over_cap_is_rejected() {
    let Deployment {
        client,
        bank,
        price_feed,
    } = deploy().await;
    let user = funded(&client, 2 * LAMPORTS_PER_SOL).await;

    // 600 SOL at $2,000 is over the $1,000,000 cap; the cap check runs
    // before any lamports move
    let result = client
        .deposit_native(&bank, &price_feed, &user, 600 * LAMPORTS_PER_SOL)
        .await;
    assert_bank_error(result, BankError::CapExceeded);

    let balance = client
        .balance_of(&bank, &user.pubkey(), &NATIVE_ASSET)
        .await
        .unwrap();
    assert_eq!(balance, 0);
}

#[tokio::test]
#[ignore = "requires a local validator with kipu-bank deployed"]
async fn test_withdraw_restores_balance() {
    let Deployment {
        client,
        bank,
        price_feed,
    } = deploy().await;
    let user = funded(&client, 2 * LAMPORTS_PER_SOL).await;

    client
        .deposit_native(&bank, &price_feed, &user, LAMPORTS_PER_SOL)
        .await
        .expect("deposit");

    let over = client
        .withdraw_native(&bank, &user, LAMPORTS_PER_SOL + 1)
        .await;
    assert_bank_error(over, BankError::InsufficientBalance);

    client
        .withdraw_native(&bank, &user, LAMPORTS_PER_SOL)
        .await
        .expect("withdraw");

    let balance = client
        .balance_of(&bank, &user.pubkey(), &NATIVE_ASSET)
        .await
        .unwrap();
    assert_eq!(balance, 0);

    let state = client.fetch_bank(&bank).await.unwrap().expect("bank account");
    assert_eq!(state.total_usd_value, 0);
}

#[tokio::test]
#[ignore = "requires a local validator with kipu-bank deployed"]
async fn test_withdraw_without_deposit_is_insufficient() {
    let Deployment { client, bank, .. } = deploy().await;
    let user = funded(&client, LAMPORTS_PER_SOL).await;

    let result = client.withdraw_native(&bank, &user, 1).await;
    assert_bank_error(result, BankError::InsufficientBalance);

    let balance = client
        .balance_of(&bank, &user.pubkey(), &NATIVE_ASSET)
        .await
        .unwrap();
    assert_eq!(balance, 0);
}
