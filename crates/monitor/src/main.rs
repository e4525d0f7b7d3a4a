use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use trade_monitor::config;
use trade_monitor::core::monitor::MonitoringLoop;
use trade_monitor::logging;
use trade_monitor::sources::{HttpAccountSource, ProcessTableProbe};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignore if missing).
    let _ = dotenvy::dotenv();

    // Determine config directory — default to `./config`.
    let config_dir = std::env::var("MONITOR_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    // Load and validate configuration. Invalid config is fatal.
    let config = config::load_config(&config_dir)?;

    // Initialize tracing — hold the guard for the process lifetime.
    let _guard = logging::init_tracing(&config.logging)?;

    info!(
        config_dir = %config_dir.display(),
        poll_interval_seconds = config.monitor.poll_interval_seconds,
        alert_threshold = config.monitor.alert_threshold,
        call_timeout_seconds = config.monitor.call_timeout_seconds,
        account_url = %config.account_source.base_url,
        process = %config.process.name,
        "trade monitor starting"
    );

    // -----------------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------------

    let call_timeout = Duration::from_secs(config.monitor.call_timeout_seconds);
    let account_source = Arc::new(
        HttpAccountSource::new(config.account_source.base_url.clone(), call_timeout)
            .context("failed to initialize account source")?,
    );
    let process_probe = Arc::new(ProcessTableProbe::new(config.process.name.clone()));

    // -----------------------------------------------------------------------
    // Monitoring loop
    // -----------------------------------------------------------------------

    let shutdown = CancellationToken::new();
    let mut monitor = MonitoringLoop::new(
        account_source,
        process_probe,
        &config.monitor,
        config.thresholds,
        shutdown.clone(),
    );

    let monitor_handle = tokio::spawn(async move {
        if let Err(e) = monitor.run().await {
            error!(error = %e, "monitoring loop exited with error");
        }
    });

    info!("monitoring agent running — press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    info!("shutdown signal received, finishing current cycle...");
    shutdown.cancel();

    if let Err(e) = monitor_handle.await {
        error!(error = %e, "monitoring loop task panicked");
    }

    info!("shutdown complete");
    Ok(())
}
