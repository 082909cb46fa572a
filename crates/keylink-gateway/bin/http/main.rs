mod cli;

use crate::cli::{Cli, StorageBackendArg};
use anyhow::Context;
use clap::Parser;
use keylink_core::{Repository, UrlManager};
use keylink_gateway::{App, AppState};
use keylink_generator::RandomGenerator;
use keylink_shortener::{ManagerSettings, RecordManager};
use keylink_storage::{InMemoryRepository, MySqlRepository};
use keylink_telemetry::TelemetryConfig;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::try_parse()?;

    let _telemetry = keylink_telemetry::init(
        &TelemetryConfig::builder()
            .service_name("keylink-gateway")
            .log_format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        key_length = config.key_length,
        "starting gateway server"
    );

    let settings = ManagerSettings::builder()
        .secret_suffix_length(config.secret_suffix_length)
        .max_key_attempts(config.max_key_attempts)
        .max_insert_attempts(config.max_insert_attempts)
        .admin_lookup(config.admin_lookup.into())
        .build();
    let generator = RandomGenerator::new(config.key_length);

    let manager = match config.storage {
        StorageBackendArg::InMemory => {
            build_manager(InMemoryRepository::new(), generator, settings)
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn).await?;
            repository.migrate().await?;
            build_manager(repository, generator, settings)
        }
    };

    let state = AppState::new(manager, config.base_url);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn build_manager<R: Repository>(
    repository: R,
    generator: RandomGenerator,
    settings: ManagerSettings,
) -> Arc<dyn UrlManager> {
    Arc::new(RecordManager::with_settings(repository, generator, settings))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
