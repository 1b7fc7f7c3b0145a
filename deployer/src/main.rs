//! Deploys a KipuBank and reports its address.

use anyhow::Context;
use solana_sdk::signature::Signer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kipu_bank_deployer::{client::read_keypair, BankClient, Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kipu_bank_deployer=info,kipu_deploy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let price_feed = config.require_price_feed()?;

    let deployer = read_keypair(&config.keypair_path)
        .with_context(|| format!("loading {}", config.keypair_path.display()))?;

    info!(account = %deployer.pubkey(), "Deploying bank with account");
    info!(
        rpc_url = %config.rpc_url,
        program_id = %config.program_id,
        bank_cap_usd = config.bank_cap_usd,
        %price_feed,
        "Configuration loaded"
    );

    let client = BankClient::new(&config.rpc_url, config.program_id);
    let bank = client
        .deploy(
            &deployer,
            &price_feed,
            config.bank_cap_usd,
            config.max_price_age_secs,
        )
        .await?;

    info!(%bank, "KipuBank deployed");
    Ok(())
}
