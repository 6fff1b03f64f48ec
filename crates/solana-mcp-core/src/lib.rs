pub mod error;
pub mod traits;
pub mod types;

pub use error::Error;
pub use traits::LedgerClient;
pub use types::{AccountInfo, Commitment, LatestBlockhash, NodeVersion, Pubkey};
