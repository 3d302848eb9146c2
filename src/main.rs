//! Gatekey server — session and token lifecycle service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gatekey_api::state::AppState;
use gatekey_auth::session::SessionManager;
use gatekey_auth::token::TokenIssuer;
use gatekey_core::config::{AppConfig, StoreBackend};
use gatekey_core::error::AppError;
use gatekey_database::store::{SessionStore, UserStore};
use gatekey_database::{DatabasePool, MemoryStore, PgSessionStore, PgUserStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("GATEKEY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Gatekey v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(config);

    // ── Step 1: Session store ────────────────────────────────────
    let (user_store, session_store) = build_stores(&config).await?;

    // ── Step 2: Auth system ──────────────────────────────────────
    let token_issuer = Arc::new(TokenIssuer::new(&config.auth));
    let session_manager = Arc::new(SessionManager::new(
        user_store,
        session_store,
        Arc::clone(&token_issuer),
        &config.auth,
    ));

    // ── Step 3: HTTP surface ─────────────────────────────────────
    let state = AppState::new(Arc::clone(&config), session_manager, token_issuer);
    let router = gatekey_api::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Gatekey listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))?;

    tracing::info!("Gatekey stopped");
    Ok(())
}

/// Connect the configured store backend.
async fn build_stores(
    config: &AppConfig,
) -> Result<(Arc<dyn UserStore>, Arc<dyn SessionStore>), AppError> {
    match config.database.backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?;
            if !pool.health_check().await? {
                return Err(AppError::database("Database health check failed"));
            }

            gatekey_database::migration::run_migrations(pool.pool()).await?;

            let users = Arc::new(PgUserStore::new(pool.pool().clone()));
            let sessions = Arc::new(PgSessionStore::new(pool.pool().clone()));
            Ok((users, sessions))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; sessions die with the process");
            let store = Arc::new(MemoryStore::new());
            Ok((store.clone(), store))
        }
    }
}

/// Resolves when the process receives ctrl-c.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown signal received");
}
