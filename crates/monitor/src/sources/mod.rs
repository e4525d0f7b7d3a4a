//! Collaborator interfaces consumed by the monitoring loop.
//!
//! Each has a real adapter and a scripted one for tests.

pub mod alert;
pub mod http_account;
pub mod process_probe;
pub mod scripted;

use async_trait::async_trait;

use crate::errors::MonitorError;
use crate::types::{AccountSnapshot, SustainedFailureAlert};

pub use alert::NoopAlertSink;
pub use http_account::HttpAccountSource;
pub use process_probe::ProcessTableProbe;
pub use scripted::{ScriptedAccountSource, ScriptedProcessProbe};

/// Provides account snapshots on demand.
///
/// No retry happens behind this interface; any error is one failed check.
#[async_trait]
pub trait AccountSource: Send + Sync {
    fn name(&self) -> &str;

    async fn capture(&self) -> Result<AccountSnapshot, MonitorError>;
}

/// Reports whether the trading process is running.
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn is_alive(&self) -> Result<bool, MonitorError>;
}

/// Delivery hook for the sustained-failure alert.
#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, alert: &SustainedFailureAlert) -> Result<(), MonitorError>;
}
