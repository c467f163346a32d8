// Well-known program identifiers and account layout constants.
//
// `solana_program::pubkey!` catches malformed literals at compile time.

use solana_program::pubkey::Pubkey;

/// Original SPL Token program
pub const TOKEN_PROGRAM_ID: Pubkey = solana_program::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Token-2022 (token extensions) program
pub const TOKEN_2022_PROGRAM_ID: Pubkey = solana_program::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// Metaplex Token Metadata program, owner of legacy token metadata PDAs
pub const METADATA_PROGRAM_ID: Pubkey = solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Size of a legacy SPL token account (and of the base part of a Token-2022 account)
pub const TOKEN_ACCOUNT_LEN: usize = 165;

/// Offset of the mint address inside a token account
pub const MINT_OFFSET: usize = 0;

/// Offset of the owner address inside a token account
pub const OWNER_OFFSET: usize = 32;

/// Offset of the little-endian u64 amount inside a token account
pub const AMOUNT_OFFSET: usize = 64;

/// Bytes needed to read both owner and amount
pub const HOLDER_DATA_MIN_LEN: usize = AMOUNT_OFFSET + 8;

/// Token-2022 `AccountType` discriminator written right after the base layout
pub const EXTENDED_ACCOUNT_TYPE_OFFSET: usize = TOKEN_ACCOUNT_LEN;
pub const EXTENDED_ACCOUNT_TYPE_ACCOUNT: u8 = 2;

pub const UNKNOWN_LEGACY_NAME: &str = "Unknown SPL Token";
pub const UNKNOWN_EXTENDED_NAME: &str = "Unknown Token-2022";
pub const UNKNOWN_SYMBOL: &str = "UNK";

/// Recipient used for gated transfers when none is configured
pub const DEFAULT_TRANSFER_RECIPIENT: &str = "Hfz8tc8QjSXqgiyugAksdmQw9UJZCp7BruZXDRTSfdge";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_match_spl_crates() {
        assert_eq!(TOKEN_PROGRAM_ID, spl_token::id());
        assert_eq!(TOKEN_2022_PROGRAM_ID, spl_token_2022::id());
    }

    #[test]
    fn test_token_account_len_matches_spl_layout() {
        use solana_program::program_pack::Pack;
        assert_eq!(TOKEN_ACCOUNT_LEN, spl_token::state::Account::LEN);
    }

    #[test]
    fn test_metadata_program_id() {
        assert_eq!(
            METADATA_PROGRAM_ID.to_string(),
            "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"
        );
    }
}
