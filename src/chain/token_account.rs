use crate::chain::classifier::TokenProgramVariant;
use crate::chain::constants::{
    AMOUNT_OFFSET, EXTENDED_ACCOUNT_TYPE_ACCOUNT, EXTENDED_ACCOUNT_TYPE_OFFSET, HOLDER_DATA_MIN_LEN,
    OWNER_OFFSET, TOKEN_ACCOUNT_LEN,
};
use crate::error::{HolderError, HolderResult};
use solana_sdk::pubkey::Pubkey;

/// Owner and raw balance read out of one token account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHolder {
    pub owner: Pubkey,
    pub amount: u64,
}

/// Decode owner (bytes 32..64) and amount (u64 LE, bytes 64..72) from a token account.
///
/// Both program variants share the base account layout; Token-2022 appends an
/// account-type byte and TLV extensions after byte 165, which is checked when present.
pub fn decode_holder(data: &[u8], variant: TokenProgramVariant) -> HolderResult<RawHolder> {
    if data.len() < HOLDER_DATA_MIN_LEN {
        return Err(HolderError::MalformedAccountData {
            len: data.len(),
            required: HOLDER_DATA_MIN_LEN,
        });
    }

    if variant == TokenProgramVariant::Extended
        && data.len() > TOKEN_ACCOUNT_LEN
        && data[EXTENDED_ACCOUNT_TYPE_OFFSET] != EXTENDED_ACCOUNT_TYPE_ACCOUNT
    {
        // an extended blob that is not a token account (e.g. a mint)
        return Err(HolderError::MalformedAccountData {
            len: data.len(),
            required: TOKEN_ACCOUNT_LEN,
        });
    }

    let mut owner = [0u8; 32];
    owner.copy_from_slice(&data[OWNER_OFFSET..OWNER_OFFSET + 32]);

    let mut amount = [0u8; 8];
    amount.copy_from_slice(&data[AMOUNT_OFFSET..AMOUNT_OFFSET + 8]);

    Ok(RawHolder {
        owner: Pubkey::new_from_array(owner),
        amount: u64::from_le_bytes(amount),
    })
}
