pub mod address;
pub mod classifier;
pub mod client;
pub mod constants;
pub mod holders;
pub mod metadata;
pub mod token_account;

pub use address::{is_valid_address, parse_address};
pub use classifier::{classify_mint, ClassifiedMint, TokenProgramVariant};
pub use client::{LedgerClient, RpcLedgerClient};
pub use holders::{scan_holders, HolderAccount};
pub use metadata::{resolve_mint, MintInfo, ResolvedMint, TokenLabel};
