use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_ACCOUNT_URL, DEFAULT_ALERT_THRESHOLD, DEFAULT_CALL_TIMEOUT_SECONDS,
    DEFAULT_CRITICAL_DRAWDOWN_PCT, DEFAULT_LOG_DIR, DEFAULT_LOG_FILTER,
    DEFAULT_MARGIN_CALL_LEVEL_PCT, DEFAULT_POLL_INTERVAL_SECONDS, DEFAULT_PROCESS_NAME,
    DEFAULT_SIGNIFICANT_MOVE_PCT,
};

// ---------------------------------------------------------------------------
// Top-level aggregate (monitor.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub monitor: LoopConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub account_source: AccountSourceConfig,
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Loop cadence and escalation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoopConfig {
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_call_timeout")]
    pub call_timeout_seconds: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            call_timeout_seconds: DEFAULT_CALL_TIMEOUT_SECONDS,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification thresholds, all in percent
// ---------------------------------------------------------------------------

/// Percent thresholds. Each value must be a JSON string (`"5"`, `"-10"`), not
/// a JSON number, so no precision is lost on the way into a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_significant_move", with = "rust_decimal::serde::str")]
    pub significant_move_pct: Decimal,
    #[serde(default = "default_critical_drawdown", with = "rust_decimal::serde::str")]
    pub critical_drawdown_pct: Decimal,
    #[serde(default = "default_margin_call_level", with = "rust_decimal::serde::str")]
    pub margin_call_level_pct: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significant_move_pct: DEFAULT_SIGNIFICANT_MOVE_PCT,
            critical_drawdown_pct: DEFAULT_CRITICAL_DRAWDOWN_PCT,
            margin_call_level_pct: DEFAULT_MARGIN_CALL_LEVEL_PCT,
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Terminal bridge exposing the account-info endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSourceConfig {
    #[serde(default = "default_account_url")]
    pub base_url: String,
}

impl Default for AccountSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ACCOUNT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessConfig {
    /// Image name (Windows) or command-line pattern (elsewhere) of the trading bot.
    #[serde(default = "default_process_name")]
    pub name: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROCESS_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// `EnvFilter` directive. `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: DEFAULT_LOG_DIR.to_string(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// serde defaults
// ---------------------------------------------------------------------------

fn default_alert_threshold() -> u32 {
    DEFAULT_ALERT_THRESHOLD
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECONDS
}

fn default_call_timeout() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECONDS
}

fn default_significant_move() -> Decimal {
    DEFAULT_SIGNIFICANT_MOVE_PCT
}

fn default_critical_drawdown() -> Decimal {
    DEFAULT_CRITICAL_DRAWDOWN_PCT
}

fn default_margin_call_level() -> Decimal {
    DEFAULT_MARGIN_CALL_LEVEL_PCT
}

fn default_account_url() -> String {
    DEFAULT_ACCOUNT_URL.to_string()
}

fn default_process_name() -> String {
    DEFAULT_PROCESS_NAME.to_string()
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
