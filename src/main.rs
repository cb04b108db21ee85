//! Staffgate Server: employee identity and authorization service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use staffgate_api::{AppState, build_router};
use staffgate_core::config::{AppConfig, StoreBackend};
use staffgate_core::error::{AppError, ErrorKind};
use staffgate_database::store::AccountStore;
use staffgate_database::{DatabasePool, MemoryAccountStore};
use staffgate_service::{build_transport, ensure_owner};

#[tokio::main]
async fn main() {
    let env = std::env::var("STAFFGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Staffgate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Account store ────────────────────────────────────
    let (store, db_pool): (Arc<dyn AccountStore>, Option<DatabasePool>) =
        match config.database.backend {
            StoreBackend::Postgres => {
                tracing::info!("Connecting to database...");
                let db_pool = DatabasePool::connect(&config.database).await?;
                (Arc::new(db_pool.account_store()), Some(db_pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory account store; accounts are lost on restart");
                (Arc::new(MemoryAccountStore::new()), None)
            }
        };

    // ── Step 2: Email transport ──────────────────────────────────
    let mailer = build_transport(&config.email)?;
    tracing::info!(transport = ?config.email.transport, "Email transport initialized");

    // ── Step 3: Services and state ───────────────────────────────
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let bootstrap = config.bootstrap.clone();
    let state = AppState::new(config, store, mailer)?;

    // ── Step 4: Bootstrap owner ──────────────────────────────────
    ensure_owner(state.store.as_ref(), &state.hasher, &bootstrap).await?;

    // ── Step 5: Serve ────────────────────────────────────────────
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to bind {bind_addr}"),
                e,
            )
        })?;
    tracing::info!("Listening on {}", bind_addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    let deadline = async move {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;
        }
        _ = deadline => {
            tracing::warn!("Grace period elapsed with requests in flight; stopping");
        }
    }

    if let Some(db_pool) = db_pool {
        db_pool.close().await;
    }

    tracing::info!("Staffgate stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
