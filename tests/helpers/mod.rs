// Helper utilities for holder selection integration tests
//
// This module provides:
// - An in-memory ledger implementing `LedgerClient`
// - Builders for real SPL / Token-2022 mint and token account blobs
// - Metaplex metadata account fixtures
// - A ready-made `Config` for the HTTP layer

#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_program::program_option::COption;
use solana_program::program_pack::Pack;
use solana_client::rpc_filter::RpcFilterType;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use token_holder_raffle::chain::constants::{
    METADATA_PROGRAM_ID, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use token_holder_raffle::chain::metadata::metaplex_metadata_address;
use token_holder_raffle::chain::{LedgerClient, TokenProgramVariant};
use token_holder_raffle::config::{
    Config, LoggingConfig, RaffleConfig, RpcConfig, ServerConfig, TransferConfig,
};
use token_holder_raffle::{HolderError, HolderResult};

/// Token-2022 extension type of embedded token metadata
const TOKEN_METADATA_EXTENSION: u16 = 19;
/// Token-2022 extension type of ImmutableOwner
const IMMUTABLE_OWNER_EXTENSION: u16 = 7;

/// In-memory ledger; counts every call so tests can assert none were made.
pub struct FakeLedger {
    accounts: HashMap<Pubkey, Account>,
    calls: AtomicUsize,
    scan_error: Option<String>,
    blockhash: Hash,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            calls: AtomicUsize::new(0),
            scan_error: None,
            blockhash: Hash::new_unique(),
        }
    }

    pub fn with_account(mut self, address: Pubkey, account: Account) -> Self {
        self.accounts.insert(address, account);
        self
    }

    /// Add a token account for `mint` owned by `owner` with `amount` raw units.
    pub fn with_holder(self, mint: &Pubkey, owner: &Pubkey, amount: u64, variant: TokenProgramVariant) -> Self {
        self.with_account(Pubkey::new_unique(), token_account(mint, owner, amount, variant))
    }

    pub fn failing_scan(mut self, message: &str) -> Self {
        self.scan_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }
}

fn matches_filters(account: &Account, filters: &[RpcFilterType]) -> bool {
    filters.iter().all(|filter| match filter {
        RpcFilterType::DataSize(size) => account.data.len() as u64 == *size,
        RpcFilterType::Memcmp(memcmp) => memcmp.bytes_match(&account.data),
        _ => true,
    })
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_account(&self, pubkey: &Pubkey) -> HolderResult<Option<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.get(pubkey).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<RpcFilterType>,
    ) -> HolderResult<Vec<(Pubkey, Account)>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.scan_error {
            return Err(HolderError::UpstreamUnavailable(message.clone()));
        }

        Ok(self
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| matches_filters(account, &filters))
            .map(|(address, account)| (*address, account.clone()))
            .collect())
    }

    async fn get_latest_blockhash(&self) -> HolderResult<Hash> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.blockhash)
    }
}

// ============================================================================
// ACCOUNT BUILDERS
// ============================================================================

fn account(owner: Pubkey, data: Vec<u8>) -> Account {
    Account {
        lamports: 2_039_280,
        data,
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

fn mint_data(decimals: u8) -> Vec<u8> {
    let mint = spl_token::state::Mint {
        mint_authority: COption::None,
        supply: u64::MAX / 2,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    spl_token::state::Mint::pack(mint, &mut data).expect("pack mint");
    data
}

fn borsh_string(out: &mut Vec<u8>, value: &str) {
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    out.extend_from_slice(value.as_bytes());
}

pub fn legacy_mint(decimals: u8) -> Account {
    account(TOKEN_PROGRAM_ID, mint_data(decimals))
}

/// Token-2022 mint, optionally carrying an embedded TokenMetadata extension.
pub fn extended_mint(mint: &Pubkey, decimals: u8, label: Option<(&str, &str)>) -> Account {
    let mut data = mint_data(decimals);
    if let Some((name, symbol)) = label {
        data.resize(165, 0);
        data.push(1); // AccountType::Mint

        let mut value = Vec::new();
        value.extend_from_slice(&[0u8; 32]);
        value.extend_from_slice(mint.as_ref());
        borsh_string(&mut value, name);
        borsh_string(&mut value, symbol);
        borsh_string(&mut value, "https://example.com/token.json");
        value.extend_from_slice(&0u32.to_le_bytes());

        data.extend_from_slice(&TOKEN_METADATA_EXTENSION.to_le_bytes());
        data.extend_from_slice(&(value.len() as u16).to_le_bytes());
        data.extend_from_slice(&value);
    }
    account(TOKEN_2022_PROGRAM_ID, data)
}

pub fn token_account(mint: &Pubkey, owner: &Pubkey, amount: u64, variant: TokenProgramVariant) -> Account {
    let state = spl_token::state::Account {
        mint: *mint,
        owner: *owner,
        amount,
        delegate: COption::None,
        state: spl_token::state::AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    };
    let mut data = vec![0u8; spl_token::state::Account::LEN];
    spl_token::state::Account::pack(state, &mut data).expect("pack token account");

    match variant {
        TokenProgramVariant::Legacy => account(TOKEN_PROGRAM_ID, data),
        TokenProgramVariant::Extended => {
            data.push(2); // AccountType::Account
            data.extend_from_slice(&IMMUTABLE_OWNER_EXTENSION.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
            account(TOKEN_2022_PROGRAM_ID, data)
        }
    }
}

fn nul_padded(value: &str, width: usize) -> String {
    let mut padded = value.to_string();
    padded.extend(std::iter::repeat('\0').take(width.saturating_sub(value.len())));
    padded
}

/// Metaplex metadata PDA and account for `mint`.
pub fn metaplex_metadata(mint: &Pubkey, name: &str, symbol: &str) -> (Pubkey, Account) {
    let mut data = vec![4u8]; // Key::MetadataV1
    data.extend_from_slice(&[0u8; 32]);
    data.extend_from_slice(mint.as_ref());
    // names are NUL padded on-chain
    borsh_string(&mut data, &nul_padded(name, 32));
    borsh_string(&mut data, &nul_padded(symbol, 10));
    borsh_string(&mut data, &nul_padded("https://example.com/meta.json", 200));
    data.extend_from_slice(&[0u8; 64]);

    (metaplex_metadata_address(mint), account(METADATA_PROGRAM_ID, data))
}

/// Raw units for `tokens` whole tokens
pub fn units(tokens: u64, decimals: u8) -> u64 {
    tokens * 10u64.pow(decimals as u32)
}

// ============================================================================
// CONFIG
// ============================================================================

pub const RECIPIENT: &str = "Hfz8tc8QjSXqgiyugAksdmQw9UJZCp7BruZXDRTSfdge";

pub fn test_config(transfer_required: bool) -> Config {
    Config {
        rpc: RpcConfig {
            url: "http://localhost:8899".to_string(),
            commitment: CommitmentConfig::confirmed(),
            timeout_seconds: 5,
        },
        raffle: RaffleConfig {
            default_min_balance: 1_000_000,
        },
        transfer: TransferConfig {
            required: transfer_required,
            amount: Decimal::from_str("0.1").unwrap(),
            lamports: 100_000_000,
            recipient: Pubkey::from_str(RECIPIENT).unwrap(),
        },
        server: ServerConfig {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            static_dir: PathBuf::from("target/no-client-bundle"),
        },
        logging: LoggingConfig {
            log_level: "debug".to_string(),
            log_dir: None,
        },
    }
}
