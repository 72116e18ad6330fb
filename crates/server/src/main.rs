//! Ballot server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use ballot_api::{AppState, CatalogState, app};
use ballot_common::Config;
use ballot_core::{DEFAULT_CATALOG, ReconcileService};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballot=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting ballot server...");

    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    let db = ballot_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    ballot_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Converge the catalog before serving; a failure leaves the previous catalog in place
    let result = ReconcileService::new(Arc::clone(&db))
        .reconcile(DEFAULT_CATALOG)
        .await;
    if let Err(e) = &result {
        error!(error = %e, "Catalog reconciliation failed, serving the existing catalog");
    }
    let catalog = CatalogState::from_result(&result);

    let state = AppState::new(&db, catalog);
    let app = app(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
