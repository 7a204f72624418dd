// Ledger Datasource - Web Server
// Loads the ledger once, then serves the dashboard's JSON protocol

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledger_datasource::{router, AppState, Config, Ledger, VERSION};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log);

    info!("📒 Ledger Datasource v{}", VERSION);

    // Load ledger (a parse failure stops here, before anything is served)
    let ledger = Ledger::load(&config.ledger_file)
        .with_context(|| format!("Failed to load ledger {}", config.ledger_file.display()))?;
    info!(
        transactions = ledger.len(),
        "✓ Ledger loaded: {}",
        config.ledger_file.display()
    );

    // Build the account index once; both are read-only from here on
    let state = AppState::new(ledger);
    info!(names = state.index.len(), "✓ Account index built");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    info!("🚀 Server running on http://{}", config.listen);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
