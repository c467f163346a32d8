use crate::chain::client::LedgerClient;
use crate::chain::constants::{TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::error::{HolderError, HolderResult};
use serde::Serialize;
use solana_sdk::{account::Account, pubkey::Pubkey};
use std::fmt;
use tracing::debug;

/// Which token program governs a mint and its holder accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenProgramVariant {
    /// Original SPL Token program, fixed 165-byte accounts
    #[serde(rename = "SPL_TOKEN")]
    Legacy,
    /// Token-2022, accounts may carry extensions after the base layout
    #[serde(rename = "TOKEN_2022")]
    Extended,
}

impl TokenProgramVariant {
    pub fn from_owner(owner: &Pubkey) -> Self {
        if *owner == TOKEN_2022_PROGRAM_ID {
            TokenProgramVariant::Extended
        } else {
            TokenProgramVariant::Legacy
        }
    }

    pub fn program_id(&self) -> Pubkey {
        match self {
            TokenProgramVariant::Legacy => TOKEN_PROGRAM_ID,
            TokenProgramVariant::Extended => TOKEN_2022_PROGRAM_ID,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenProgramVariant::Legacy => "SPL_TOKEN",
            TokenProgramVariant::Extended => "TOKEN_2022",
        }
    }
}

impl fmt::Display for TokenProgramVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mint account together with the program variant that owns it.
#[derive(Debug, Clone)]
pub struct ClassifiedMint {
    pub address: Pubkey,
    pub variant: TokenProgramVariant,
    pub account: Account,
}

/// Fetch the mint account and classify its owning program.
///
/// Unknown owners fall back to `Legacy`; a missing account is an upstream failure.
pub async fn classify_mint(client: &dyn LedgerClient, mint: &Pubkey) -> HolderResult<ClassifiedMint> {
    let account = client
        .get_account(mint)
        .await?
        .ok_or_else(|| HolderError::UpstreamUnavailable(format!("Mint account {} not found", mint)))?;

    let variant = TokenProgramVariant::from_owner(&account.owner);
    debug!("Mint {} owned by {} -> {}", mint, account.owner, variant);

    Ok(ClassifiedMint {
        address: *mint,
        variant,
        account,
    })
}
