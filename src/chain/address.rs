use solana_sdk::pubkey::{Pubkey, PUBKEY_BYTES};

/// Parse a base-58 account address, `None` on anything that is not exactly 32 bytes.
pub fn parse_address(candidate: &str) -> Option<Pubkey> {
    if candidate.is_empty() {
        return None;
    }

    let bytes = bs58::decode(candidate).into_vec().ok()?;
    let bytes: [u8; PUBKEY_BYTES] = bytes.try_into().ok()?;
    Some(Pubkey::new_from_array(bytes))
}

pub fn is_valid_address(candidate: &str) -> bool {
    parse_address(candidate).is_some()
}
