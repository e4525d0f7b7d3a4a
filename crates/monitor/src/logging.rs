//! Tracing subscriber setup: a daily-rolled JSON file for the audit trail and
//! a compact stderr stream for whoever is watching the console.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::LOG_FILE_NAME;

/// Pick the filter directive: a non-blank `RUST_LOG` value beats the
/// configured one.
pub fn select_filter_directive(rust_log: Option<String>, configured: &str) -> String {
    rust_log
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| configured.to_string())
}

/// Build the [`EnvFilter`] for this process from `RUST_LOG` and `logging.filter`.
pub fn build_env_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    let directive = select_filter_directive(std::env::var("RUST_LOG").ok(), &logging.filter);
    EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter directive: {directive}"))
}

/// Initialise the global tracing subscriber.
///
/// Returns a [`WorkerGuard`] that **must** be held for the lifetime of the
/// process; dropping it flushes the file writer.
pub fn init_tracing(logging: &LoggingConfig) -> Result<WorkerGuard> {
    let env_filter = build_env_filter(logging)?;

    std::fs::create_dir_all(&logging.log_dir)
        .with_context(|| format!("failed to create log directory: {}", logging.log_dir))?;
    let file_appender = tracing_appender::rolling::daily(&logging.log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LOG_FILTER;
    use serial_test::serial;

    #[test]
    fn test_rust_log_beats_configured_filter() {
        let directive =
            select_filter_directive(Some("trade_monitor=debug".into()), DEFAULT_LOG_FILTER);
        assert_eq!(directive, "trade_monitor=debug");
    }

    #[test]
    fn test_blank_rust_log_falls_back_to_config() {
        assert_eq!(select_filter_directive(None, "warn"), "warn");
        assert_eq!(select_filter_directive(Some("  ".into()), "warn"), "warn");
    }

    #[test]
    #[serial]
    fn test_default_filter_builds() {
        std::env::remove_var("RUST_LOG");
        assert!(build_env_filter(&LoggingConfig::default()).is_ok());
    }

    #[test]
    #[serial]
    fn test_invalid_configured_filter_is_rejected() {
        std::env::remove_var("RUST_LOG");
        let logging = LoggingConfig {
            filter: "trade_monitor=loudest".into(),
            ..LoggingConfig::default()
        };
        let err = build_env_filter(&logging).unwrap_err();
        assert!(err.to_string().contains("trade_monitor=loudest"));
    }
}
