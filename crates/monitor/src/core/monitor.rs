//! Monitoring loop: polls the trading process and the account, classifies
//! account changes, and escalates sustained failures.
//!
//! Key features:
//! - Single writer: `HealthState` lives inside the loop and is only touched
//!   between collaborator calls of one cycle
//! - Decaying error counter: every check moves it by one (+1 failed, −1 ok,
//!   floored at zero), so one cycle moves it by −2..=+2
//! - Call-level timeout on every collaborator call
//! - Graceful shutdown via CancellationToken, honoured at the sleep boundary

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{LoopConfig, Thresholds};
use crate::sources::{AccountSource, AlertSink, NoopAlertSink, ProcessProbe};
use crate::types::{
    AccountSnapshot, Classification, CyclePhase, CycleReport, HealthState, Severity,
    SnapshotDelta, SustainedFailureAlert,
};

use super::health_evaluator::{evaluate, snapshot_delta};

/// Long-running monitoring agent.
pub struct MonitoringLoop {
    account_source: Arc<dyn AccountSource>,
    process_probe: Arc<dyn ProcessProbe>,
    alert_sink: Arc<dyn AlertSink>,
    thresholds: Thresholds,
    poll_interval: Duration,
    call_timeout: Duration,
    state: HealthState,
    phase: CyclePhase,
    shutdown: CancellationToken,
}

impl MonitoringLoop {
    pub fn new(
        account_source: Arc<dyn AccountSource>,
        process_probe: Arc<dyn ProcessProbe>,
        config: &LoopConfig,
        thresholds: Thresholds,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            account_source,
            process_probe,
            alert_sink: Arc::new(NoopAlertSink),
            thresholds,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            call_timeout: Duration::from_secs(config.call_timeout_seconds),
            state: HealthState::new(config.alert_threshold),
            phase: CyclePhase::Idle,
            shutdown,
        }
    }

    /// Replace the default no-op alert sink.
    pub fn with_alert_sink(mut self, alert_sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = alert_sink;
        self
    }

    pub fn state(&self) -> &HealthState {
        &self.state
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Main loop. Runs cycles back to back with `poll_interval` sleeps in
    /// between until the CancellationToken is cancelled.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            poll_interval_seconds = self.poll_interval.as_secs(),
            alert_threshold = self.state.alert_threshold,
            account_source = self.account_source.name(),
            process_probe = self.process_probe.name(),
            alert_sink = self.alert_sink.name(),
            "monitoring agent started"
        );

        loop {
            let report = self.run_cycle().await;
            debug!(
                process_ok = report.process_ok,
                account_ok = report.account_ok,
                classifications = ?report.classifications,
                consecutive_errors = report.consecutive_error_count,
                alert_raised = report.alert_raised,
                "cycle complete"
            );

            self.phase = CyclePhase::Sleeping;
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!(
                        consecutive_errors = self.state.consecutive_error_count,
                        "monitoring agent stopped"
                    );
                    break;
                }
                () = tokio::time::sleep(self.poll_interval) => {}
            }
            self.phase = CyclePhase::Idle;
        }

        self.phase = CyclePhase::Idle;
        Ok(())
    }

    /// One full cycle: process check, account check, evaluation, counter
    /// update and escalation. Never fails: collaborator errors become
    /// counter movements.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.phase = CyclePhase::CheckingProcess;
        let process_ok = self.check_process().await;

        self.phase = CyclePhase::CheckingAccount;
        let snapshot = self.capture_account().await;
        let account_ok = snapshot.is_some();

        self.phase = CyclePhase::Evaluating;
        let classifications = match snapshot {
            Some(current) => {
                let classifications = self.evaluate_and_log(&current);
                self.state.previous_snapshot = Some(current);
                classifications
            }
            None => Vec::new(),
        };

        // Process check first, then account check: the floor applies after each.
        self.state.record_check(process_ok);
        self.state.record_check(account_ok);

        self.phase = CyclePhase::Escalating;
        let alert_raised = self.escalate(process_ok, account_ok).await;

        CycleReport {
            process_ok,
            account_ok,
            classifications,
            consecutive_error_count: self.state.consecutive_error_count,
            alert_raised,
        }
    }

    // -----------------------------------------------------------------------
    // Collaborator calls
    // -----------------------------------------------------------------------

    async fn check_process(&self) -> bool {
        match tokio::time::timeout(self.call_timeout, self.process_probe.is_alive()).await {
            Ok(Ok(true)) => true,
            Ok(Ok(false)) => {
                error!(
                    severity = Severity::Critical.as_str(),
                    probe = self.process_probe.name(),
                    "CRITICAL: trading bot process not found"
                );
                false
            }
            Ok(Err(e)) => {
                error!(error = %e, probe = self.process_probe.name(), "error checking bot process");
                false
            }
            Err(_) => {
                error!(
                    timeout_seconds = self.call_timeout.as_secs(),
                    probe = self.process_probe.name(),
                    "process check timed out"
                );
                false
            }
        }
    }

    async fn capture_account(&self) -> Option<AccountSnapshot> {
        match tokio::time::timeout(self.call_timeout, self.account_source.capture()).await {
            Ok(Ok(snapshot)) => Some(snapshot),
            Ok(Err(e)) => {
                error!(error = %e, source = self.account_source.name(), "failed to get account info");
                None
            }
            Err(_) => {
                error!(
                    timeout_seconds = self.call_timeout.as_secs(),
                    source = self.account_source.name(),
                    "account capture timed out"
                );
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Evaluation and escalation
    // -----------------------------------------------------------------------

    fn evaluate_and_log(&self, current: &AccountSnapshot) -> Vec<Classification> {
        let previous = self.state.previous_snapshot.as_ref();
        let classifications = evaluate(previous, current, &self.thresholds);
        let delta = previous
            .map(|prev| snapshot_delta(prev, current))
            .unwrap_or_default();

        for classification in &classifications {
            log_classification(*classification, current, &delta);
        }

        info!(
            balance = %current.balance,
            equity = %current.equity,
            profit = %current.unrealized_profit,
            margin_level = ?current.margin_level,
            equity_change_pct = ?delta.equity_change_pct.map(|p| p.round_dp(2)),
            balance_change_pct = ?delta.balance_change_pct.map(|p| p.round_dp(2)),
            timestamp = current.timestamp,
            "account status"
        );

        classifications
    }

    async fn escalate(&self, process_ok: bool, account_ok: bool) -> bool {
        if !self.state.alert_due() {
            return false;
        }

        error!(
            severity = Severity::Critical.as_str(),
            consecutive_errors = self.state.consecutive_error_count,
            alert_threshold = self.state.alert_threshold,
            process_ok,
            account_ok,
            "ALERT: {} consecutive errors detected",
            self.state.consecutive_error_count
        );

        let alert = SustainedFailureAlert {
            consecutive_error_count: self.state.consecutive_error_count,
            alert_threshold: self.state.alert_threshold,
            process_ok,
            account_ok,
            timestamp: chrono::Utc::now().timestamp(),
        };
        if let Err(e) = self.alert_sink.send(&alert).await {
            warn!(error = %e, sink = self.alert_sink.name(), "alert delivery failed");
        }

        true
    }
}

/// Emit one classification at its designated severity.
fn log_classification(
    classification: Classification,
    current: &AccountSnapshot,
    delta: &SnapshotDelta,
) {
    let severity = classification.severity();
    let equity_change_pct = delta.equity_change_pct.map(|p| p.round_dp(2));
    match severity {
        Severity::Info => {}
        Severity::Warning => warn!(
            severity = severity.as_str(),
            classification = ?classification,
            equity_change_pct = ?equity_change_pct,
            equity = %current.equity,
            margin_level = ?current.margin_level,
            "{}",
            classification.headline()
        ),
        Severity::Critical => error!(
            severity = severity.as_str(),
            classification = ?classification,
            equity_change_pct = ?equity_change_pct,
            equity = %current.equity,
            margin_level = ?current.margin_level,
            "{}",
            classification.headline()
        ),
    }
}
