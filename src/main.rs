//! Haven shell: runs the session layer headless.
//!
//! Loads configuration, initialises logging, and drives an [`AppShell`]
//! over file-backed storage until Ctrl+C.

mod platform;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use haven_client::{AppShell, ClientState, Platform};
use haven_core::config::AppConfig;
use haven_core::error::AppError;
use haven_realtime::WsTransport;
use haven_session::FileStore;

use crate::platform::{EnvCookies, LogDocument, LogNavigator, LogNotifier};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("HAVEN_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
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

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Haven shell v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Persisted storage ────────────────────────────────
    if let Some(parent) = std::path::Path::new(&config.storage.path).parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::storage(format!("Failed to create dir '{}': {}", parent.display(), e))
        })?;
    }
    let storage = Arc::new(FileStore::open(&config.storage.path)?);
    tracing::info!("Storage opened at '{}'", config.storage.path);

    // ── Step 2: Platform adapters ────────────────────────────────
    let start_url = config.client.start_url.clone();
    let platform = Platform {
        storage,
        cookies: Arc::new(EnvCookies::from_env()),
        navigator: Arc::new(LogNavigator::for_url(&start_url)),
        notifier: Arc::new(LogNotifier),
        document: Arc::new(LogDocument),
    };

    // ── Step 3: Client ───────────────────────────────────────────
    let transport = Arc::new(WsTransport::new(config.realtime.url.clone()));
    let state = ClientState::build(config, platform, transport)?;
    let shell = AppShell::new(state);

    let outcome = shell.start(&start_url).await?;
    tracing::info!("Initial route: {:?}", outcome);

    // ── Step 4: Run until shutdown ───────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    shell.shutdown().await;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
