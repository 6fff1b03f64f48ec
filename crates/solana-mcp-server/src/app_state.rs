use std::sync::Arc;

use solana_mcp_core::traits::LedgerClient;
use solana_mcp_core::types::Pubkey;
use solana_mcp_protocol::{Dispatcher, RegistryError, ServerInfo};

use crate::tools;

/// Static facts about the ledger network this server fronts.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub network: String,
    pub rpc_url: String,
    pub provider_wallet: Pubkey,
}

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub network: Arc<NetworkInfo>,
    pub allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Build the state with the standard ledger tool set registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool fails to register.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        network: NetworkInfo,
        allowed_origins: Vec<String>,
    ) -> Result<Self, RegistryError> {
        let network = Arc::new(network);
        let registry = tools::ledger_registry(ledger, Arc::clone(&network))?;

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(server_info(), registry)),
            network,
            allowed_origins: Arc::new(allowed_origins),
        })
    }
}

/// Identity reported by `initialize` and the root info endpoint.
#[must_use]
pub fn server_info() -> ServerInfo {
    ServerInfo {
        name: "solana-mcp-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Solana MCP server for blockchain interactions".to_string(),
    }
}
