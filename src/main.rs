// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing_subscriber::EnvFilter;

use campaign_server::{
    api::router,
    auth::{TokenError, TokenService},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{DocumentStore, MemoryStore, RedbStore, StoreError},
};

/// Time given to in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("token service: {0}")]
    Token(#[from] TokenError),

    #[error("document store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to install rustls crypto provider")]
    CryptoProvider,

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections");
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let tokens = TokenService::new(&config.jwt_secret)?;

    let store: Arc<dyn DocumentStore> = match config.database_path() {
        Some(path) => Arc::new(RedbStore::open(&path)?),
        None => {
            tracing::warn!("DATA_DIR not set, documents are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    store.ping()?;

    let app = router(AppState::new(store, tokens));
    let addr = config.bind_addr;

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    match config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls before any TLS operations
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| StartupError::CryptoProvider)?;

            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

            tracing::info!(%addr, "Campaign server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(%addr, "Campaign server listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Campaign server failed");
            ExitCode::FAILURE
        }
    }
}
