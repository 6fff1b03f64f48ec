use async_trait::async_trait;

use crate::error::Error;
use crate::types::{AccountInfo, LatestBlockhash, NodeVersion, Pubkey};

/// Read-only access to a ledger RPC node.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of an account, in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, Error>;

    /// Account metadata, or `None` if the account does not exist.
    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<AccountInfo>, Error>;

    /// The most recent blockhash seen by the node.
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, Error>;

    /// The slot the node has reached at the configured commitment.
    async fn get_slot(&self) -> Result<u64, Error>;

    /// Software version of the node.
    async fn get_version(&self) -> Result<NodeVersion, Error>;
}
