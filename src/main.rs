use anyhow::{Context, Result};
use std::sync::Arc;
use token_holder_raffle::chain::RpcLedgerClient;
use token_holder_raffle::config::Config;
use token_holder_raffle::logging::init_tracing;
use token_holder_raffle::server::{start_server, AppState};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // ========================================================================
    // Step 1: Load configuration, then install tracing
    // ========================================================================
    let config = Arc::new(Config::load().context("Failed to load configuration")?);
    let _log_guard = init_tracing(&config.logging)?;

    info!("🚀 Starting token holder raffle...");
    info!("✅ Configuration loaded successfully");
    debug!("RPC: {} (commitment {:?}, timeout {}s)",
        config.rpc.url, config.rpc.commitment.commitment, config.rpc.timeout_seconds);
    info!("   Default min balance: {}", config.raffle.default_min_balance);
    if config.transfer.required {
        info!("   Transfer confirmation: {} SOL to {}", config.transfer.amount, config.transfer.recipient);
    } else {
        info!("   Transfer confirmation: disabled");
    }

    // ========================================================================
    // Step 2: Initialize the ledger client shared by all requests
    // ========================================================================
    let client = Arc::new(RpcLedgerClient::new(
        config.rpc.url.clone(),
        config.rpc.commitment,
        config.rpc.timeout(),
    ));
    info!("✅ RPC client initialized");

    // ========================================================================
    // Step 3: Serve
    // ========================================================================
    let state = Arc::new(AppState::new(Arc::clone(&config), client)?);
    start_server(state).await
}
