use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use solana_mcp_core::traits::LedgerClient;
use solana_mcp_core::types::{lamports_to_sol, Pubkey};
use solana_mcp_rpc::RpcClient;
use solana_mcp_server::app_state::{AppState, NetworkInfo};
use solana_mcp_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let provider_wallet = config.provider_wallet.unwrap_or_else(|| {
        tracing::info!("PROVIDER_WALLET not set, using an ephemeral address");
        Pubkey::new(rand::random())
    });

    let ledger = Arc::new(RpcClient::new(
        config.rpc_url.clone(),
        config.commitment,
        config.rpc_timeout(),
    )?);

    let state = AppState::new(
        ledger.clone(),
        NetworkInfo {
            network: config.network.clone(),
            rpc_url: config.rpc_url.clone(),
            provider_wallet,
        },
        config.allowed_origins.clone(),
    )?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        network = %config.network,
        commitment = %config.commitment,
        timeout_secs = config.rpc_timeout_secs,
        %provider_wallet,
        "connected to ledger"
    );
    for tool in state.dispatcher.tools().await {
        tracing::info!(tool = %tool.name, "{}", tool.description);
    }

    // Best effort: the balance is informational and must not delay startup.
    tokio::spawn(async move {
        match ledger.get_balance(&provider_wallet).await {
            Ok(lamports) => tracing::info!(sol = lamports_to_sol(lamports), "provider balance"),
            Err(e) => tracing::warn!(error = %e, "provider balance unknown"),
        }
    });

    let app = solana_mcp_server::router::create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Solana MCP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
