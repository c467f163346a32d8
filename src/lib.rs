// Token Holder Raffle Library
//
// Picks a pseudo-random eligible holder of an SPL or Token-2022 token:
// - Mint classification by owning token program
// - Decimals and best-effort name/symbol resolution
// - Holder account scan with minimum balance filtering
// - Uniform random selection
// - HTTP surface with optional wallet-gated transfer

pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod selection;
pub mod server;
pub mod utils;

pub use error::{HolderError, HolderResult};
pub use selection::{HolderPicker, SelectionResult};
