use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use solana_mcp_core::error::Error;
use solana_mcp_core::traits::LedgerClient;
use solana_mcp_core::types::{AccountInfo, Commitment, LatestBlockhash, NodeVersion, Pubkey};

/// Upper bound on a single RPC round trip unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC over HTTP implementation of [`LedgerClient`].
///
/// One instance is shared by every in-flight request; `reqwest::Client`
/// pools connections internally.
#[derive(Debug)]
pub struct RpcClient {
    url: String,
    http: reqwest::Client,
    commitment: Commitment,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the node at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        commitment: Commitment,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http,
            commitment,
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    fn config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    fn transport_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Transport(err.to_string())
        }
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, url = %self.url, "ledger rpc request");

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{method} returned HTTP {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(&e))?;
        let envelope: RpcEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| Error::Decode(format!("{method}: {e}")))?;

        match envelope {
            RpcEnvelope {
                error: Some(err), ..
            } => Err(Error::Rpc {
                code: err.code,
                message: err.message,
            }),
            RpcEnvelope {
                result: Some(result),
                ..
            } => Ok(result),
            RpcEnvelope { .. } => Err(Error::Decode(format!(
                "{method}: response carried neither result nor error"
            ))),
        }
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, Error> {
        let resp: WithContext<u64> = self
            .request("getBalance", json!([address.to_string(), self.config()]))
            .await?;
        Ok(resp.value)
    }

    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<AccountInfo>, Error> {
        let mut config = self.config();
        config["encoding"] = json!("base64");
        let resp: WithContext<Option<AccountInfo>> = self
            .request("getAccountInfo", json!([address.to_string(), config]))
            .await?;
        Ok(resp.value)
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, Error> {
        let resp: WithContext<LatestBlockhash> = self
            .request("getLatestBlockhash", json!([self.config()]))
            .await?;
        Ok(resp.value)
    }

    async fn get_slot(&self) -> Result<u64, Error> {
        self.request("getSlot", json!([self.config()])).await
    }

    async fn get_version(&self) -> Result<NodeVersion, Error> {
        self.request("getVersion", json!([])).await
    }
}

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Slot-stamped wrapper most ledger queries return their value in.
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}
