use std::time::Duration;

use clap::Parser;

use solana_mcp_core::types::{Commitment, Pubkey};

/// Public devnet endpoint used when `RPC_URL` is not set.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Origins allowed by CORS unless `ALLOWED_ORIGINS` overrides them.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:8080",
    "https://solonchain.netlify.app",
    "https://solana-mcp-dashboard.netlify.app",
    "https://solana-mcp-dashboard.vercel.app",
];

/// Server configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "solana-mcp-server",
    version,
    about = "Solana ledger queries over the MCP JSON-RPC tool protocol"
)]
pub struct Config {
    /// Ledger RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Interface to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Network name reported by health and info endpoints
    #[arg(long, env = "SOLANA_NETWORK", default_value = "devnet")]
    pub network: String,

    /// Commitment level sent with every ledger query
    #[arg(long, env = "RPC_COMMITMENT", default_value = "confirmed")]
    pub commitment: Commitment,

    /// Upper bound on a single ledger RPC call, in seconds
    #[arg(long, env = "RPC_TIMEOUT_SECS", default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    /// Wallet reported as the provider; a random address is used if unset
    #[arg(long, env = "PROVIDER_WALLET")]
    pub provider_wallet: Option<Pubkey>,

    /// Comma-separated list of exact origins allowed by CORS
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = DEFAULT_ALLOWED_ORIGINS
    )]
    pub allowed_origins: Vec<String>,
}

impl Config {
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["solana-mcp-server"]).unwrap();
        if std::env::var_os("RPC_URL").is_none() {
            assert_eq!(cfg.rpc_url, DEFAULT_RPC_URL);
        }
        if std::env::var_os("PORT").is_none() {
            assert_eq!(cfg.port, 3000);
        }
        if std::env::var_os("ALLOWED_ORIGINS").is_none() {
            assert_eq!(cfg.allowed_origins.len(), DEFAULT_ALLOWED_ORIGINS.len());
        }
    }

    #[test]
    fn flags_override() {
        let cfg = Config::try_parse_from([
            "solana-mcp-server",
            "--rpc-url",
            "http://127.0.0.1:8899",
            "--port",
            "8080",
            "--commitment",
            "finalized",
            "--rpc-timeout-secs",
            "5",
            "--provider-wallet",
            "11111111111111111111111111111111",
            "--allowed-origins",
            "https://a.example,https://b.example",
        ])
        .unwrap();

        assert_eq!(cfg.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.commitment, Commitment::Finalized);
        assert_eq!(cfg.rpc_timeout(), Duration::from_secs(5));
        assert!(cfg.provider_wallet.is_some());
        assert_eq!(cfg.allowed_origins, ["https://a.example", "https://b.example"]);
        assert!(cfg.listen_addr().ends_with(":8080"));
    }

    #[test]
    fn invalid_provider_wallet_rejected() {
        let result = Config::try_parse_from([
            "solana-mcp-server",
            "--provider-wallet",
            "definitely-not-base58!",
        ]);
        assert!(result.is_err());
    }
}
