use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hrflow_api::config::{ServerConfig, StoreBackend};
use hrflow_api::state::AppState;
use hrflow_api::{bootstrap, router, ws};
use hrflow_db::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hrflow_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        store = ?config.store_backend,
        "Loaded server configuration"
    );
    if !config.jwt.is_configured() {
        tracing::warn!("JWT_SECRET is not set; authenticated requests will fail");
    }

    // --- Store ---
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = hrflow_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            hrflow_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            hrflow_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::seed_admin(store.as_ref(), admin)
            .await
            .context("Failed to seed the bootstrap admin")?;
    }

    // --- App state ---
    let state = AppState::new(Arc::clone(&store), config.clone());
    let ws_manager = Arc::clone(&state.ws_manager);

    // --- Heartbeat ---
    let heartbeat_cancel = CancellationToken::new();
    let heartbeat_handle = ws::start_heartbeat(
        Arc::clone(&ws_manager),
        ws::HEARTBEAT_INTERVAL,
        heartbeat_cancel.clone(),
    );

    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        heartbeat_handle,
    )
    .await;
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
