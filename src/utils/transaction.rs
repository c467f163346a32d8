use crate::chain::client::LedgerClient;
use crate::config::TransferConfig;
use crate::error::{HolderError, HolderResult};
use base64::Engine;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::{
    hash::Hash, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, system_instruction,
    transaction::Transaction,
};
use tracing::debug;

/// Unsigned transfer handed to the client wallet for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDescriptor {
    pub transaction_base64: String,
}

/// Convert a SOL amount to whole lamports; `None` for negative or out-of-range amounts.
pub fn sol_to_lamports(amount: Decimal) -> Option<u64> {
    amount
        .checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .and_then(|lamports| lamports.trunc().to_u64())
}

/// Builds the payer → recipient transfer a gated request must pay.
pub struct TransferBuilder {
    payer: Pubkey,
    recipient: Pubkey,
    lamports: u64,
}

impl TransferBuilder {
    pub fn new(payer: Pubkey, transfer: &TransferConfig) -> Self {
        Self {
            payer,
            recipient: transfer.recipient,
            lamports: transfer.lamports,
        }
    }

    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    /// Unsigned legacy transaction; fee payer is the paying wallet.
    pub fn build_unsigned(&self, recent_blockhash: Hash) -> Transaction {
        let instruction = system_instruction::transfer(&self.payer, &self.recipient, self.lamports);
        let mut transaction = Transaction::new_with_payer(&[instruction], Some(&self.payer));
        transaction.message.recent_blockhash = recent_blockhash;
        transaction
    }

    /// Fetch a blockhash and encode the unsigned transaction in wire format.
    pub async fn build_descriptor(&self, client: &dyn LedgerClient) -> HolderResult<TransferDescriptor> {
        let recent_blockhash = client.get_latest_blockhash().await?;
        let transaction = self.build_unsigned(recent_blockhash);

        let bytes = bincode::serialize(&transaction)
            .map_err(|e| HolderError::upstream("Failed to serialize transfer", e))?;

        debug!(
            "Built transfer of {} lamports {} -> {} ({} bytes)",
            self.lamports,
            self.payer,
            self.recipient,
            bytes.len()
        );

        Ok(TransferDescriptor {
            transaction_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }
}
