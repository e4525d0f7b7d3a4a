use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Escalation
// ---------------------------------------------------------------------------

/// Error-counter value at which the sustained-failure alert fires.
pub const DEFAULT_ALERT_THRESHOLD: u32 = 5;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Seconds between monitoring cycles.
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 300;

/// Upper bound on a single collaborator call (account capture, liveness check).
pub const DEFAULT_CALL_TIMEOUT_SECONDS: u64 = 30;

// ---------------------------------------------------------------------------
// Classification thresholds (percent)
// ---------------------------------------------------------------------------

/// |equity change| strictly above this is a significant move.
pub const DEFAULT_SIGNIFICANT_MOVE_PCT: Decimal = dec!(5);

/// Equity change strictly below this is a critical drawdown.
pub const DEFAULT_CRITICAL_DRAWDOWN_PCT: Decimal = dec!(-10);

/// Margin level strictly below this carries margin-call risk.
pub const DEFAULT_MARGIN_CALL_LEVEL_PCT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

pub const DEFAULT_ACCOUNT_URL: &str = "http://127.0.0.1:8765";

/// Image name the trading bot runs under.
pub const DEFAULT_PROCESS_NAME: &str = "python.exe";

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "trade_monitor=info,warn";

/// Log file name inside the log directory (rotated daily).
pub const LOG_FILE_NAME: &str = "monitor.log";
