use anyhow::Result;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use super::types::MonitorConfig;
use crate::errors::MonitorError;

/// Validate invariants across the loaded config that serde alone cannot enforce.
///
/// All problems are collected and reported together as a single
/// [`MonitorError::Config`]. Called automatically by [`super::load_config`].
pub fn validate_config(config: &MonitorConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_loop_config(config, &mut errors);
    validate_thresholds(config, &mut errors);
    validate_collaborators(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let msg = format!(
            "validation failed ({} error{}):\n  - {}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            errors.join("\n  - ")
        );
        Err(MonitorError::Config(msg).into())
    }
}

// ---------------------------------------------------------------------------
// Loop cadence and escalation
// ---------------------------------------------------------------------------

fn validate_loop_config(config: &MonitorConfig, errors: &mut Vec<String>) {
    let lp = &config.monitor;

    if lp.alert_threshold == 0 {
        errors.push("monitor: alert_threshold must be positive".into());
    }
    if lp.poll_interval_seconds == 0 {
        errors.push("monitor: poll_interval_seconds must be positive".into());
    }
    if lp.call_timeout_seconds == 0 {
        errors.push("monitor: call_timeout_seconds must be positive".into());
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

fn validate_thresholds(config: &MonitorConfig, errors: &mut Vec<String>) {
    let t = &config.thresholds;

    if t.significant_move_pct <= Decimal::ZERO {
        errors.push(format!(
            "thresholds: significant_move_pct ({}) must be > 0",
            t.significant_move_pct
        ));
    }
    if t.critical_drawdown_pct >= Decimal::ZERO {
        errors.push(format!(
            "thresholds: critical_drawdown_pct ({}) must be < 0",
            t.critical_drawdown_pct
        ));
    }
    if t.margin_call_level_pct <= Decimal::ZERO {
        errors.push(format!(
            "thresholds: margin_call_level_pct ({}) must be > 0",
            t.margin_call_level_pct
        ));
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

fn validate_collaborators(config: &MonitorConfig, errors: &mut Vec<String>) {
    if let Err(e) = validate_url(&config.account_source.base_url) {
        errors.push(format!("account_source.base_url: {e}"));
    }
    if config.process.name.trim().is_empty() {
        errors.push("process: name is empty".into());
    }
    if config.logging.log_dir.trim().is_empty() {
        errors.push("logging: log_dir is empty".into());
    }
    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(format!("logging.filter '{}': {e}", config.logging.filter));
    }
}

/// Validate an HTTP(S) base URL.
pub fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL is empty".into());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("must start with http:// or https://, got '{url}'"));
    }
    Ok(())
}
