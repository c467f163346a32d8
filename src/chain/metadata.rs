use crate::chain::classifier::{ClassifiedMint, TokenProgramVariant};
use crate::chain::client::LedgerClient;
use crate::chain::constants::{
    METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID, UNKNOWN_EXTENDED_NAME, UNKNOWN_LEGACY_NAME,
    UNKNOWN_SYMBOL,
};
use crate::error::{HolderError, HolderResult};
use borsh::BorshDeserialize;
use solana_program::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token_2022::extension::{BaseStateWithExtensions, ExtensionType, StateWithExtensions};
use spl_token_metadata_interface::state::TokenMetadata;
use thiserror::Error;
use tracing::{debug, warn};

/// Decimal precision of a mint and the program that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    pub variant: TokenProgramVariant,
}

/// Human-readable token name and ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLabel {
    pub name: String,
    pub symbol: String,
}

impl TokenLabel {
    /// Sentinel label used when a token carries no usable metadata.
    pub fn unknown(variant: TokenProgramVariant) -> Self {
        let name = match variant {
            TokenProgramVariant::Legacy => UNKNOWN_LEGACY_NAME,
            TokenProgramVariant::Extended => UNKNOWN_EXTENDED_NAME,
        };
        Self {
            name: name.to_string(),
            symbol: UNKNOWN_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedMint {
    pub info: MintInfo,
    pub label: TokenLabel,
}

/// Why a name/symbol lookup came back empty. Never leaves this module.
#[derive(Debug, Error)]
enum MetadataError {
    #[error("no metadata for mint")]
    NotFound,
    #[error("malformed metadata: {0}")]
    Malformed(String),
    #[error(transparent)]
    Upstream(#[from] HolderError),
}

/// Leading fields of a Metaplex `Metadata` account; the rest is ignored.
#[derive(BorshDeserialize)]
struct MetaplexMetadataHeader {
    key: u8,
    _update_authority: [u8; 32],
    _mint: [u8; 32],
    name: String,
    symbol: String,
}

const METAPLEX_KEY_METADATA_V1: u8 = 4;

/// Read decimals from the mint and look up its name/symbol.
///
/// Only a decimals failure is an error; metadata problems degrade to
/// `TokenLabel::unknown`.
pub async fn resolve_mint(client: &dyn LedgerClient, mint: &ClassifiedMint) -> HolderResult<ResolvedMint> {
    let decimals = read_decimals(mint)?;
    let info = MintInfo {
        decimals,
        variant: mint.variant,
    };

    let label = match mint.variant {
        TokenProgramVariant::Legacy => {
            resolve_or_default(fetch_metaplex_label(client, &mint.address).await, mint)
        }
        TokenProgramVariant::Extended => {
            resolve_or_default(read_embedded_label(&mint.account.data), mint)
        }
    };

    debug!(
        "Resolved mint {}: decimals={}, name={}, symbol={}",
        mint.address, decimals, label.name, label.symbol
    );

    Ok(ResolvedMint { info, label })
}

fn resolve_or_default(result: Result<TokenLabel, MetadataError>, mint: &ClassifiedMint) -> TokenLabel {
    match result {
        Ok(label) => label,
        Err(MetadataError::NotFound) => {
            debug!("No metadata for mint {}, using sentinel label", mint.address);
            TokenLabel::unknown(mint.variant)
        }
        Err(e) => {
            warn!("Metadata lookup for mint {} failed: {}", mint.address, e);
            TokenLabel::unknown(mint.variant)
        }
    }
}

fn read_decimals(mint: &ClassifiedMint) -> HolderResult<u8> {
    let data = &mint.account.data;
    match mint.variant {
        TokenProgramVariant::Legacy => {
            if mint.account.owner != TOKEN_PROGRAM_ID {
                return Err(HolderError::UpstreamUnavailable(format!(
                    "Account {} is not owned by a token program",
                    mint.address
                )));
            }
            spl_token::state::Mint::unpack(data)
                .map(|m| m.decimals)
                .map_err(|e| HolderError::upstream(&format!("Failed to parse mint {}", mint.address), e))
        }
        TokenProgramVariant::Extended => {
            StateWithExtensions::<spl_token_2022::state::Mint>::unpack(data)
                .map(|state| state.base.decimals)
                .map_err(|e| HolderError::upstream(&format!("Failed to parse mint {}", mint.address), e))
        }
    }
}

pub fn metaplex_metadata_address(mint: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[b"metadata", METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    );
    address
}

async fn fetch_metaplex_label(client: &dyn LedgerClient, mint: &Pubkey) -> Result<TokenLabel, MetadataError> {
    let metadata_address = metaplex_metadata_address(mint);
    let account = client
        .get_account(&metadata_address)
        .await?
        .ok_or(MetadataError::NotFound)?;

    if account.owner != METADATA_PROGRAM_ID {
        return Err(MetadataError::Malformed(format!(
            "metadata account {} owned by {}",
            metadata_address, account.owner
        )));
    }

    decode_metaplex_label(&account.data)
}

fn decode_metaplex_label(data: &[u8]) -> Result<TokenLabel, MetadataError> {
    let header = MetaplexMetadataHeader::deserialize(&mut &data[..])
        .map_err(|e| MetadataError::Malformed(e.to_string()))?;

    if header.key != METAPLEX_KEY_METADATA_V1 {
        return Err(MetadataError::Malformed(format!("unexpected account key {}", header.key)));
    }

    Ok(TokenLabel {
        name: clean(&header.name),
        symbol: clean(&header.symbol),
    })
}

fn read_embedded_label(data: &[u8]) -> Result<TokenLabel, MetadataError> {
    let state = StateWithExtensions::<spl_token_2022::state::Mint>::unpack(data)
        .map_err(|e| MetadataError::Malformed(e.to_string()))?;

    let extensions = state
        .get_extension_types()
        .map_err(|e| MetadataError::Malformed(e.to_string()))?;
    if !extensions.contains(&ExtensionType::TokenMetadata) {
        return Err(MetadataError::NotFound);
    }

    let metadata = state
        .get_variable_len_extension::<TokenMetadata>()
        .map_err(|e| MetadataError::Malformed(e.to_string()))?;

    Ok(TokenLabel {
        name: clean(&metadata.name),
        symbol: clean(&metadata.symbol),
    })
}

// Metaplex pads fixed-width strings with NULs
fn clean(value: &str) -> String {
    value.trim_end_matches('\0').trim().to_string()
}
