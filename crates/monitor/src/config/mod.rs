pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "monitor.json";

/// Load `monitor.json` from `config_dir` into a [`MonitorConfig`], then apply
/// environment variable overrides and validate.
///
/// Every field has a default, so a missing file yields the default config.
/// A file that exists but does not parse is an error. The `thresholds` values
/// must be JSON strings (`"significant_move_pct": "5"`); a JSON number there
/// fails the parse.
///
/// # Environment variable overrides
///
/// | Env Var                          | Config Field                      |
/// |----------------------------------|-----------------------------------|
/// | `MONITOR_ALERT_THRESHOLD`        | `monitor.alert_threshold`         |
/// | `MONITOR_POLL_INTERVAL_SECONDS`  | `monitor.poll_interval_seconds`   |
/// | `MONITOR_CALL_TIMEOUT_SECONDS`   | `monitor.call_timeout_seconds`    |
/// | `MONITOR_ACCOUNT_URL`            | `account_source.base_url`         |
/// | `MONITOR_PROCESS_NAME`           | `process.name`                    |
/// | `MONITOR_LOG_DIR`                | `logging.log_dir`                 |
pub fn load_config(config_dir: &Path) -> Result<MonitorConfig> {
    let path = config_dir.join(CONFIG_FILE_NAME);

    let mut config: MonitorConfig = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?
    } else {
        MonitorConfig::default()
    };

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides to the loaded config.
///
/// Only non-empty env vars take effect. Parse failures are skipped and the
/// file value remains.
fn apply_env_overrides(config: &mut MonitorConfig) {
    if let Some(val) = env_parse::<u32>("MONITOR_ALERT_THRESHOLD") {
        info!(val, "env override: MONITOR_ALERT_THRESHOLD");
        config.monitor.alert_threshold = val;
    }

    if let Some(val) = env_parse::<u64>("MONITOR_POLL_INTERVAL_SECONDS") {
        info!(val, "env override: MONITOR_POLL_INTERVAL_SECONDS");
        config.monitor.poll_interval_seconds = val;
    }

    if let Some(val) = env_parse::<u64>("MONITOR_CALL_TIMEOUT_SECONDS") {
        info!(val, "env override: MONITOR_CALL_TIMEOUT_SECONDS");
        config.monitor.call_timeout_seconds = val;
    }

    if let Some(val) = env_string("MONITOR_ACCOUNT_URL") {
        info!("env override: MONITOR_ACCOUNT_URL");
        config.account_source.base_url = val;
    }

    if let Some(val) = env_string("MONITOR_PROCESS_NAME") {
        info!(%val, "env override: MONITOR_PROCESS_NAME");
        config.process.name = val;
    }

    if let Some(val) = env_string("MONITOR_LOG_DIR") {
        info!(%val, "env override: MONITOR_LOG_DIR");
        config.logging.log_dir = val;
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a non-empty env var and parse it as `T`.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}
