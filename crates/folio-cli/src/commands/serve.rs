use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use folio_core::{AppConfig, AssetServer};

/// Serve the built site until Ctrl-C
pub async fn run(config: &AppConfig, dir: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let root = dir.unwrap_or_else(|| config.dist_dir());
    let port = config.server.resolve_port(port);

    if !root.is_dir() {
        anyhow::bail!("Asset directory not found: {}", root.display());
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Setup signal handler for graceful shutdown
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let server = AssetServer::new(root, port);
    println!("Serving on http://localhost:{} (Ctrl-C to stop)", server.addr().port());
    server.run(shutdown_rx).await?;

    Ok(())
}
