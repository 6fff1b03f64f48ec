use std::time::Duration;

/// Core error type for ledger queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid public key '{input}': {reason}")]
    InvalidPubkey { input: String, reason: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected RPC response: {0}")]
    Decode(String),
}
