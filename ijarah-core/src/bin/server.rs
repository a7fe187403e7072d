//! Ijarah ledger server binary

use std::sync::Arc;

use ijarah_core::{Config, InMemoryTreasury, Ledger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Ijarah Ledger Server");

    // Load configuration
    let config = Config::from_env()?;

    // The real payment rail is wired in by the deployment; the in-memory
    // treasury stands in until then.
    let treasury = Arc::new(InMemoryTreasury::default());

    let ledger = Ledger::open(config, treasury).await?;
    tracing::info!("Ledger opened successfully");

    // TODO: serve the operation surface over gRPC
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down ledger server");
    ledger.shutdown().await?;
    Ok(())
}
