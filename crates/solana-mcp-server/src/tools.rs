//! Ledger query tools exposed through `tools/call`.
//!
//! Every tool validates its own arguments before touching the ledger and
//! reports failures prefixed with the operation that failed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use solana_mcp_core::error::Error as LedgerError;
use solana_mcp_core::traits::LedgerClient;
use solana_mcp_core::types::{lamports_to_sol, Pubkey};
use solana_mcp_protocol::{RegistryError, Tool, ToolDefinition, ToolError, ToolRegistry};

use crate::app_state::NetworkInfo;

/// Build the registry of ledger tools, in the order they are listed.
///
/// # Errors
///
/// Returns an error if a tool fails to register.
pub fn ledger_registry(
    ledger: Arc<dyn LedgerClient>,
    network: Arc<NetworkInfo>,
) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new()
        .with(GetBalance {
            ledger: Arc::clone(&ledger),
        })?
        .with(GetAccountInfo {
            ledger: Arc::clone(&ledger),
        })?
        .with(GetRecentBlockhash {
            ledger: Arc::clone(&ledger),
        })?
        .with(GetSlot {
            ledger: Arc::clone(&ledger),
        })?
        .with(GetNetworkInfo { ledger, network })
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn address_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "address": {
                "type": "string",
                "description": description
            }
        },
        "required": ["address"]
    })
}

fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

fn address_arg(args: &Value) -> Result<Pubkey, ToolError> {
    let raw = match args.get("address") {
        None | Some(Value::Null) => return Err(ToolError::MissingArgument("address".into())),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ToolError::InvalidArgument {
                name: "address".into(),
                reason: format!("expected a string, got {other}"),
            })
        }
    };

    raw.parse().map_err(|e: LedgerError| ToolError::InvalidArgument {
        name: "address".into(),
        reason: e.to_string(),
    })
}

fn ledger_error(err: LedgerError) -> ToolError {
    ToolError::Execution(err.to_string())
}

/// Balance of an account in SOL and lamports.
pub struct GetBalance {
    ledger: Arc<dyn LedgerClient>,
}

impl GetBalance {
    async fn run(&self, args: &Value) -> Result<Value, ToolError> {
        let address = address_arg(args)?;
        let lamports = self
            .ledger
            .get_balance(&address)
            .await
            .map_err(ledger_error)?;

        Ok(json!({
            "balance": lamports_to_sol(lamports),
            "address": address.to_string(),
            "lamports": lamports,
        }))
    }
}

#[async_trait]
impl Tool for GetBalance {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_balance",
            "Get the balance of a Solana account",
            address_schema("The public key of the account to check"),
        )
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        self.run(&arguments)
            .await
            .map_err(|e| e.context("Failed to get balance"))
    }
}

/// Owner, lamports and flags of an account.
pub struct GetAccountInfo {
    ledger: Arc<dyn LedgerClient>,
}

impl GetAccountInfo {
    async fn run(&self, args: &Value) -> Result<Value, ToolError> {
        let address = address_arg(args)?;
        let info = self
            .ledger
            .get_account_info(&address)
            .await
            .map_err(ledger_error)?;

        // A missing account is a normal answer, not a failure.
        let Some(info) = info else {
            return Ok(json!({ "error": "Account not found" }));
        };

        Ok(json!({
            "address": address.to_string(),
            "lamports": info.lamports,
            "owner": info.owner,
            "executable": info.executable,
            "rentEpoch": info.rent_epoch,
        }))
    }
}

#[async_trait]
impl Tool for GetAccountInfo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_account_info",
            "Get account information for a Solana address",
            address_schema("The public key of the account"),
        )
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        self.run(&arguments)
            .await
            .map_err(|e| e.context("Failed to get account info"))
    }
}

/// Latest blockhash known to the node.
pub struct GetRecentBlockhash {
    ledger: Arc<dyn LedgerClient>,
}

#[async_trait]
impl Tool for GetRecentBlockhash {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_recent_blockhash",
            "Get the most recent blockhash from the network",
            empty_schema(),
        )
    }

    async fn call(&self, _arguments: Value) -> Result<Value, ToolError> {
        let latest = self
            .ledger
            .get_latest_blockhash()
            .await
            .map_err(|e| ledger_error(e).context("Failed to get recent blockhash"))?;

        Ok(json!({
            "blockhash": latest.blockhash,
            "timestamp": timestamp(),
        }))
    }
}

/// Current slot of the node.
pub struct GetSlot {
    ledger: Arc<dyn LedgerClient>,
}

#[async_trait]
impl Tool for GetSlot {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_slot", "Get the current slot number", empty_schema())
    }

    async fn call(&self, _arguments: Value) -> Result<Value, ToolError> {
        let slot = self
            .ledger
            .get_slot()
            .await
            .map_err(|e| ledger_error(e).context("Failed to get current slot"))?;

        Ok(json!({
            "slot": slot,
            "timestamp": timestamp(),
        }))
    }
}

/// Network identity plus a live snapshot of slot, blockhash and version.
pub struct GetNetworkInfo {
    ledger: Arc<dyn LedgerClient>,
    network: Arc<NetworkInfo>,
}

impl GetNetworkInfo {
    async fn run(&self) -> Result<Value, ToolError> {
        let (slot, latest, version) = tokio::try_join!(
            self.ledger.get_slot(),
            self.ledger.get_latest_blockhash(),
            self.ledger.get_version(),
        )
        .map_err(ledger_error)?;

        Ok(json!({
            "network": self.network.network,
            "rpcUrl": self.network.rpc_url,
            "currentSlot": slot,
            "latestBlockhash": latest.blockhash,
            "version": version,
            "providerWallet": self.network.provider_wallet.to_string(),
            "timestamp": timestamp(),
        }))
    }
}

#[async_trait]
impl Tool for GetNetworkInfo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_network_info",
            "Get network information and connection status",
            empty_schema(),
        )
    }

    async fn call(&self, _arguments: Value) -> Result<Value, ToolError> {
        self.run()
            .await
            .map_err(|e| e.context("Failed to get network info"))
    }
}
