mod api;
mod config;
mod error;
mod mailer;
mod models;
mod services;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Context;
use api::auth::UserIdTokens;
use api::AppState;
use config::Config;
use services::Marketplace;
use std::sync::Arc;
use store::{MarketStore, MemoryStore};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Urban Vault marketplace");

    let config = Config::load()?;

    let store: Arc<dyn MarketStore> = match &config.data_file {
        Some(path) => {
            info!("💾 Loading data from {}", path.display());
            Arc::new(MemoryStore::open(path).await?)
        }
        None => {
            warn!("DATA_FILE not set, records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let mailer = mailer::from_config(&config.mail)?;
    info!("📧 Appointment mail goes through {}", mailer.transport_name());

    let market = Arc::new(Marketplace::new(store.clone(), mailer, &config));
    let state = Arc::new(AppState {
        market,
        tokens: Arc::new(UserIdTokens::new(store)),
    });
    let app = api::router(state);

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("🚀 Listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
