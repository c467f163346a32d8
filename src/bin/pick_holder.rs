//! One-shot holder draw against the configured RPC endpoint.
//!
//!   pick-holder --mint <ADDRESS> [--min-tokens N] [--rpc-url URL]

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use token_holder_raffle::chain::RpcLedgerClient;
use token_holder_raffle::config::Config;
use token_holder_raffle::logging::init_tracing;
use token_holder_raffle::HolderPicker;

#[derive(Debug, Parser)]
#[command(name = "pick-holder", about = "Pick a random eligible holder of a token")]
struct Args {
    /// Mint address of the token
    #[arg(long)]
    mint: String,

    /// Minimum whole-token balance a holder needs (defaults to DEFAULT_MIN_BALANCE)
    #[arg(long)]
    min_tokens: Option<u64>,

    /// Override RPC_URL
    #[arg(long)]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = args.rpc_url {
        config.rpc.url = url;
    }
    let _log_guard = init_tracing(&config.logging)?;

    let client = Arc::new(RpcLedgerClient::new(
        config.rpc.url.clone(),
        config.rpc.commitment,
        config.rpc.timeout(),
    ));
    let picker = HolderPicker::new(client);

    let min_tokens = args.min_tokens.unwrap_or(config.raffle.default_min_balance);
    let result = picker.pick(&args.mint, min_tokens).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
