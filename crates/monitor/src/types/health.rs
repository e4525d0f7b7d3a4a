use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountSnapshot;

/// Log severity attached to every monitor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Outcome of comparing two account snapshots.
///
/// Checks are independent: a single cycle may carry several of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Nothing crossed a threshold. Only used for reporting an empty set.
    Nominal,
    /// |equity change| above the significant-move threshold (5 %).
    SignificantMove,
    /// Equity change below the drawdown threshold (−10 %).
    CriticalDrawdown,
    /// Margin level below the margin-call level (100 %).
    MarginCallRisk,
}

impl Severity {
    /// Same spelling as the serialized form; written into the `severity` log field.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl Classification {
    /// Log headline for this classification.
    pub fn headline(self) -> &'static str {
        match self {
            Classification::Nominal => "account nominal",
            Classification::SignificantMove => "ALERT: significant equity change",
            Classification::CriticalDrawdown => "CRITICAL: equity drawdown",
            Classification::MarginCallRisk => "CRITICAL: margin level low, risk of margin call",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Classification::Nominal => Severity::Info,
            Classification::SignificantMove => Severity::Warning,
            Classification::CriticalDrawdown | Classification::MarginCallRisk => {
                Severity::Critical
            }
        }
    }
}

/// Percentage deltas between two consecutive snapshots.
///
/// A field is `None` when the previous value was zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotDelta {
    pub equity_change_pct: Option<Decimal>,
    pub balance_change_pct: Option<Decimal>,
}

/// Mutable monitor state. Owned by the monitoring loop for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub previous_snapshot: Option<AccountSnapshot>,
    pub consecutive_error_count: u32,
    pub alert_threshold: u32,
}

impl HealthState {
    pub fn new(alert_threshold: u32) -> Self {
        Self {
            previous_snapshot: None,
            consecutive_error_count: 0,
            alert_threshold,
        }
    }

    /// Apply the result of one check to the shared error counter:
    /// +1 on failure, −1 on success (floored at zero).
    pub fn record_check(&mut self, ok: bool) {
        if ok {
            self.consecutive_error_count = self.consecutive_error_count.saturating_sub(1);
        } else {
            self.consecutive_error_count = self.consecutive_error_count.saturating_add(1);
        }
    }

    pub fn alert_due(&self) -> bool {
        self.consecutive_error_count >= self.alert_threshold
    }
}

/// Per-cycle phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    CheckingProcess,
    CheckingAccount,
    Evaluating,
    Escalating,
    Sleeping,
}

/// Summary of one completed monitoring cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub process_ok: bool,
    pub account_ok: bool,
    pub classifications: Vec<Classification>,
    pub consecutive_error_count: u32,
    pub alert_raised: bool,
}

/// Raised when the error counter reaches the configured threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainedFailureAlert {
    pub consecutive_error_count: u32,
    pub alert_threshold: u32,
    pub process_ok: bool,
    pub account_ok: bool,
    pub timestamp: i64,
}
