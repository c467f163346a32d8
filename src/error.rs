use thiserror::Error;

/// Errors surfaced by the holder selection pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HolderError {
    #[error("Invalid Solana address format")]
    InvalidAddress,

    #[error("Invalid wallet address format")]
    InvalidWalletAddress,

    /// The ledger could not be reached, timed out, or returned data we could
    /// not make sense of for a mandatory lookup.
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("No eligible token holders found.")]
    NoEligibleHolders,

    #[error("Token account data too short: {len} bytes, need at least {required}")]
    MalformedAccountData { len: usize, required: usize },
}

impl HolderError {
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        HolderError::UpstreamUnavailable(format!("{}: {}", context, err))
    }

    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            HolderError::InvalidAddress | HolderError::InvalidWalletAddress => 400,
            _ => 500,
        }
    }
}

pub type HolderResult<T> = std::result::Result<T, HolderError>;
