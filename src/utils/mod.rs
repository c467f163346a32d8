pub mod transaction;

pub use transaction::{TransferBuilder, TransferDescriptor};
