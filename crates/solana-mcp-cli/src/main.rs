use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod client;
mod slot_cmd;

use client::McpClient;

#[derive(Parser)]
#[command(name = "solana-mcp", about = "Smoke-test client for the Solana MCP server")]
struct Cli {
    /// MCP server URL
    #[arg(long, env = "MCP_URL", default_value = "http://localhost:3000")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform the `initialize` handshake and print the server identity
    Init,

    /// List the tools the server exposes
    Tools,

    /// Call a tool and print its decoded result
    Call {
        /// Tool name, e.g. `get_balance`
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Check the server's health endpoint
    Health,

    /// Read the current slot directly from a ledger RPC node
    Slot {
        /// Ledger RPC endpoint
        #[arg(long, env = "RPC_URL", default_value = "https://api.devnet.solana.com")]
        rpc_url: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = McpClient::new(cli.server_url.clone());

    match cli.command {
        Commands::Init => {
            let result = client
                .request("initialize", Some(serde_json::json!({})))
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Tools => {
            let result = client.request("tools/list", None).await?;
            for tool in result["tools"].as_array().into_iter().flatten() {
                println!(
                    "{:<24} {}",
                    tool["name"].as_str().unwrap_or_default(),
                    tool["description"].as_str().unwrap_or_default()
                );
            }
        }
        Commands::Call { tool, args } => {
            let arguments: serde_json::Value = serde_json::from_str(&args)
                .map_err(|e| anyhow::anyhow!("--args is not valid JSON: {e}"))?;
            let payload = client.call_tool(&tool, arguments).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Health => {
            let url = format!("{}/health", cli.server_url.trim_end_matches('/'));
            let resp = reqwest::get(&url).await?;
            let status = resp.status();
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            if !status.is_success() {
                anyhow::bail!("health check returned HTTP {status}");
            }
        }
        Commands::Slot {
            rpc_url,
            timeout_secs,
        } => {
            slot_cmd::run(&rpc_url, Duration::from_secs(timeout_secs)).await?;
        }
    }

    Ok(())
}
