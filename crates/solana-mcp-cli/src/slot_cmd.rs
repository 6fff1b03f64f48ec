use std::time::Duration;

use solana_mcp_core::traits::LedgerClient;
use solana_mcp_core::types::Commitment;
use solana_mcp_rpc::RpcClient;

/// Query the current slot straight from a ledger node, bypassing the server.
pub async fn run(rpc_url: &str, timeout: Duration) -> anyhow::Result<()> {
    let client = RpcClient::new(rpc_url, Commitment::Confirmed, timeout)?;
    tracing::info!("Fetching current slot from {rpc_url}");

    let slot = client.get_slot().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "slot": slot,
            "rpcUrl": rpc_url,
        }))?
    );
    Ok(())
}
