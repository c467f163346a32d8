use crate::chain::address::parse_address;
use crate::chain::classifier::{classify_mint, TokenProgramVariant};
use crate::chain::client::LedgerClient;
use crate::chain::holders::{scan_holders, HolderAccount};
use crate::chain::metadata::{resolve_mint, ResolvedMint};
use crate::error::{HolderError, HolderResult};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// The winning holder and the context it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub owner_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub adjusted_balance: Decimal,
    pub program_type: TokenProgramVariant,
    pub token_name: String,
    pub token_symbol: String,
    pub eligible_holders: usize,
}

/// Pick one holder with probability 1/N.
pub fn select_random<'a, R: Rng + ?Sized>(
    holders: &'a [HolderAccount],
    rng: &mut R,
) -> HolderResult<&'a HolderAccount> {
    holders.choose(rng).ok_or(HolderError::NoEligibleHolders)
}

pub fn assemble_result(winner: &HolderAccount, mint: &ResolvedMint, eligible_holders: usize) -> SelectionResult {
    SelectionResult {
        owner_address: winner.owner.to_string(),
        adjusted_balance: winner.adjusted_amount,
        program_type: mint.info.variant,
        token_name: mint.label.name.clone(),
        token_symbol: mint.label.symbol.clone(),
        eligible_holders,
    }
}

/// Runs validate → classify → resolve → scan → select for one request.
#[derive(Clone)]
pub struct HolderPicker {
    client: Arc<dyn LedgerClient>,
}

impl HolderPicker {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn LedgerClient> {
        &self.client
    }

    pub async fn pick(&self, mint_address: &str, min_tokens: u64) -> HolderResult<SelectionResult> {
        let mint = parse_address(mint_address).ok_or(HolderError::InvalidAddress)?;
        let client = self.client.as_ref();

        let classified = classify_mint(client, &mint).await?;
        let resolved = resolve_mint(client, &classified).await?;
        let eligible = scan_holders(client, &mint, &resolved.info, min_tokens).await?;

        let winner = {
            let mut rng = rand::thread_rng();
            select_random(&eligible, &mut rng)?
        };

        info!(
            "Selected holder {} of mint {} ({} eligible, balance {})",
            winner.owner,
            mint,
            eligible.len(),
            winner.adjusted_amount
        );

        Ok(assemble_result(winner, &resolved, eligible.len()))
    }
}
