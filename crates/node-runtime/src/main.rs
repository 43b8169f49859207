//! # Mortgage Ledger Node Runtime
//!
//! Host shim for the mortgage registry.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging (stderr; stdout carries responses)
//! 3. Open the world state and wire the registry
//! 4. Bootstrap: index aggregate plus credentials from the positional
//!    arguments (`name credential name credential ...`)
//! 5. Serve JSON-lines requests from stdin until EOF or Ctrl+C
//! 6. Log registry statistics

use anyhow::{Context, Result};
use ml_03_mortgage_registry::Bootstrap;
use node_runtime::container::{NodeConfig, NodeContainer};
use node_runtime::shim::serve;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging(filter: &str) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_new(filter).context("Invalid log filter")?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config.logging.filter)?;

    info!("===========================================");
    info!("  Mortgage Ledger Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let container = NodeContainer::new(config)?;

    let credentials: Vec<String> = std::env::args().skip(1).collect();
    Bootstrap::new(Arc::clone(&container.store), &container.config.registry)
        .run(&credentials)
        .context("Bootstrap failed")?;

    info!("Serving requests on stdin. Press Ctrl+C to stop.");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    serve(
        &container.dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown,
    )
    .await?;

    let stats = container.dispatcher.registry().stats();
    info!(
        mortgages_created = stats.mortgages_created,
        transfers_completed = stats.transfers_completed,
        permission_denials = stats.permission_denials,
        queries_served = stats.queries_served,
        "Registry statistics"
    );
    Ok(())
}
