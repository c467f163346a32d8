use crate::chain::classifier::TokenProgramVariant;
use crate::chain::client::LedgerClient;
use crate::chain::constants::{MINT_OFFSET, TOKEN_ACCOUNT_LEN};
use crate::chain::metadata::MintInfo;
use crate::chain::token_account::decode_holder;
use crate::error::HolderResult;
use rust_decimal::Decimal;
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::{account::Account, pubkey::Pubkey};
use tracing::{debug, info, warn};

/// Largest scale `rust_decimal` can represent.
const MAX_DECIMAL_SCALE: u8 = 28;

/// One token account of the target mint, decoded and scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderAccount {
    /// The token account itself
    pub address: Pubkey,
    /// Wallet that owns the token account
    pub owner: Pubkey,
    pub raw_amount: u64,
    /// `raw_amount / 10^decimals`
    pub adjusted_amount: Decimal,
}

/// Server-side filters selecting the token accounts of `mint`.
///
/// Extended accounts vary in size with their extensions, so only the legacy
/// program gets a size filter.
pub fn holder_filters(mint: &Pubkey, variant: TokenProgramVariant) -> Vec<RpcFilterType> {
    let by_mint = RpcFilterType::Memcmp(Memcmp::new_raw_bytes(MINT_OFFSET, mint.to_bytes().to_vec()));
    match variant {
        TokenProgramVariant::Legacy => vec![RpcFilterType::DataSize(TOKEN_ACCOUNT_LEN as u64), by_mint],
        TokenProgramVariant::Extended => vec![by_mint],
    }
}

/// `raw_amount / 10^decimals` for display.
///
/// Scales beyond what `Decimal` holds are truncated to 28 places.
pub fn adjust_amount(raw_amount: u64, decimals: u8) -> Decimal {
    if decimals <= MAX_DECIMAL_SCALE {
        return Decimal::from_i128_with_scale(raw_amount as i128, decimals as u32);
    }

    let shifted = 10u128
        .checked_pow((decimals - MAX_DECIMAL_SCALE) as u32)
        .map(|divisor| raw_amount as u128 / divisor)
        .unwrap_or(0);
    Decimal::from_i128_with_scale(shifted as i128, MAX_DECIMAL_SCALE as u32)
}

/// `min_tokens * 10^decimals` in raw units, `None` when no u64 balance can reach it.
pub fn threshold_units(min_tokens: u64, decimals: u8) -> Option<u128> {
    if min_tokens == 0 {
        return Some(0);
    }
    10u128
        .checked_pow(decimals as u32)
        .and_then(|scale| (min_tokens as u128).checked_mul(scale))
        .filter(|units| *units <= u64::MAX as u128)
}

/// Keep the accounts holding at least `min_tokens` whole tokens, in scan order.
///
/// The comparison runs on raw units. Blobs that fail to decode are skipped
/// with a warning.
pub fn filter_eligible(
    accounts: &[(Pubkey, Account)],
    info: &MintInfo,
    min_tokens: u64,
) -> Vec<HolderAccount> {
    let Some(threshold) = threshold_units(min_tokens, info.decimals) else {
        debug!(
            "Threshold {} tokens at {} decimals exceeds any balance",
            min_tokens, info.decimals
        );
        return Vec::new();
    };

    let mut eligible = Vec::new();
    let mut skipped = 0usize;

    for (address, account) in accounts {
        let raw = match decode_holder(&account.data, info.variant) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping token account {}: {}", address, e);
                skipped += 1;
                continue;
            }
        };

        if raw.amount as u128 >= threshold {
            eligible.push(HolderAccount {
                address: *address,
                owner: raw.owner,
                raw_amount: raw.amount,
                adjusted_amount: adjust_amount(raw.amount, info.decimals),
            });
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed token accounts", skipped);
    }

    eligible
}

/// Fetch every token account of `mint` and keep those at or above `min_tokens`.
pub async fn scan_holders(
    client: &dyn LedgerClient,
    mint: &Pubkey,
    info: &MintInfo,
    min_tokens: u64,
) -> HolderResult<Vec<HolderAccount>> {
    let program_id = info.variant.program_id();
    let filters = holder_filters(mint, info.variant);

    debug!("Scanning {} accounts for mint {}", info.variant, mint);
    let accounts = client.get_program_accounts(&program_id, filters).await?;

    let eligible = filter_eligible(&accounts, info, min_tokens);
    info!(
        "Mint {}: {} token accounts scanned, {} hold >= {} tokens",
        mint,
        accounts.len(),
        eligible.len(),
        min_tokens
    );

    Ok(eligible)
}
