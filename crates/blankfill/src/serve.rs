// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `blankfill serve` command implementation.
//!
//! Opens SQLite storage, loads the ONNX pipeline, builds the lifecycle
//! controller once and serves it over HTTP until SIGINT or SIGTERM.

use std::sync::Arc;

use blankfill_config::model::BlankfillConfig;
use blankfill_core::{BlankfillError, PluginAdapter, StorageAdapter};
use blankfill_gateway::{AuthState, GatewayState, ServerConfig, start_server};
use blankfill_inference::FillInPipeline;
use blankfill_lifecycle::RequestController;
use blankfill_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `blankfill serve` command.
pub async fn run_serve(config: BlankfillConfig) -> Result<(), BlankfillError> {
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting blankfill serve");

    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };
    info!(path = %config.storage.database_path, "storage ready");

    let pipeline = Arc::new(FillInPipeline::from_config(&config.inference).await?);

    let controller = RequestController::new(storage.clone(), pipeline.clone());

    if config.auth.jwt_secret.is_none() {
        warn!("auth.jwt_secret is not set -- every /request call will be rejected");
    }

    let state = GatewayState::new(
        controller,
        config.gateway.default_page_size,
        config.gateway.max_page_size,
    );
    let auth = AuthState::new(config.auth.jwt_secret.as_deref());
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let cancel = shutdown::install_signal_handler();
    start_server(&server_config, state, auth, cancel).await?;

    pipeline.shutdown().await?;
    storage.shutdown().await?;

    info!("blankfill serve shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blankfill={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
