use crate::chain::constants::DEFAULT_TRANSFER_RECIPIENT;
use crate::utils::transaction::sol_to_lamports;
use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Process-wide settings, built once at startup and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc: RpcConfig,
    pub raffle: RaffleConfig,
    pub transfer: TransferConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// RPC endpoint configuration
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub commitment: CommitmentConfig,
    pub timeout_seconds: u64,
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct RaffleConfig {
    /// Whole tokens a holder needs when the caller gives no threshold
    pub default_min_balance: u64,
}

/// Wallet-gated transfer settings
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub required: bool,
    /// Amount in SOL
    pub amount: Decimal,
    /// `amount` in whole lamports
    pub lamports: u64,
    pub recipient: Pubkey,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `.env` (if present) and the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Build configuration from the current process environment only
    pub fn from_env() -> Result<Self> {
        let commitment_level = get_env_or_default("COMMITMENT_LEVEL", "confirmed");
        let rpc = RpcConfig {
            url: get_env_or_default("RPC_URL", "https://api.mainnet-beta.solana.com"),
            commitment: CommitmentConfig::from_str(&commitment_level)
                .map_err(|e| anyhow::anyhow!("Invalid COMMITMENT_LEVEL '{}': {}", commitment_level, e))?,
            timeout_seconds: get_u64_env("RPC_TIMEOUT_SECONDS", 10)?,
        };

        let raffle = RaffleConfig {
            default_min_balance: get_u64_env("DEFAULT_MIN_BALANCE", 1_000_000)?,
        };

        let amount = get_decimal_env("TRANSACTION_AMOUNT", Decimal::new(1, 1))?;
        if amount.is_sign_negative() {
            bail!("TRANSACTION_AMOUNT must not be negative, got {}", amount);
        }
        let lamports = sol_to_lamports(amount)
            .with_context(|| format!("TRANSACTION_AMOUNT {} SOL does not fit in u64 lamports", amount))?;
        let transfer = TransferConfig {
            required: get_flag_env("TRANSACTION_CONFIRMATION"),
            amount,
            lamports,
            recipient: parse_pubkey_or_default("TRANSACTION_RECIPIENT", DEFAULT_TRANSFER_RECIPIENT)?,
        };

        let bind_address = get_env_or_default("BIND_ADDRESS", "0.0.0.0:3000");
        let server = ServerConfig {
            bind_address: bind_address
                .parse()
                .context(format!("Failed to parse BIND_ADDRESS '{}'", bind_address))?,
            static_dir: PathBuf::from(get_env_or_default("STATIC_DIR", "dist")),
        };

        let logging = LoggingConfig {
            log_level: get_env_or_default("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from),
        };

        Ok(Config {
            rpc,
            raffle,
            transfer,
            server,
            logging,
        })
    }
}

// ============================================================================
// Helper Functions for Environment Variable Parsing
// ============================================================================

/// Get environment variable or return default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `1` or `true` (any case) switch a flag on; anything else is off
fn get_flag_env(key: &str) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true")
        })
        .unwrap_or(false)
}

/// Get u64 environment variable with default
fn get_u64_env(key: &str, default: u64) -> Result<u64> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .context(format!("Failed to parse {} as u64", key))
}

fn get_decimal_env(key: &str, default: Decimal) -> Result<Decimal> {
    match std::env::var(key) {
        Ok(value) => Decimal::from_str(value.trim()).context(format!("Failed to parse {} as a decimal", key)),
        Err(_) => Ok(default),
    }
}

fn parse_pubkey_or_default(env_var: &str, default: &str) -> Result<Pubkey> {
    let pubkey_str = get_env_or_default(env_var, default);
    Pubkey::from_str(pubkey_str.trim()).context(format!("Failed to parse {} as Pubkey", env_var))
}
