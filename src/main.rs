// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use clap::Parser;
use federated_ingress_dns::{
    constants::CONTROLLER_NAME,
    controller,
    dnsprovider::init_dns_provider,
    federation::KubeFederationClient,
    metrics,
    options::Options,
    resolver::SystemResolver,
};
use kube::Client;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let options = Options::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .thread_name(CONTROLLER_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(options))
}

async fn async_main(options: Options) -> Result<()> {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT (json or text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!(controller = CONTROLLER_NAME, "Starting federated ingress DNS controller");
    debug!(options = ?options, "Parsed options");

    let provider = init_dns_provider(&options.dns_provider, options.dns_provider_config.as_deref())
        .await
        .context("failed to initialize DNS provider")?;

    debug!("Initializing Kubernetes client");
    let client = Client::try_default()
        .await
        .context("failed to connect to the federation API server")?;

    let ctx = controller::initialize(
        &options,
        provider.as_ref(),
        Arc::new(KubeFederationClient::new(client)),
        Arc::new(SystemResolver),
    )
    .await
    .context("controller initialization failed")?;

    if let Some(addr) = options.metrics_bind_address {
        tokio::spawn(async move {
            if let Err(e) = metrics::serve_metrics(addr).await {
                error!("Metrics server exited: {e}");
            }
        });
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let running = tokio::spawn(controller::run(
        Arc::new(ctx),
        options.workers,
        options.resync_period(),
        shutdown_rx,
    ));

    wait_for_shutdown_signal().await?;
    info!("Shutdown signal received, draining work queue");
    if shutdown_tx.send(true).is_err() {
        debug!("Controller already stopped");
    }

    running.await.context("controller task failed")?;
    info!("Graceful shutdown completed");
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}
