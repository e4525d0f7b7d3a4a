use async_trait::async_trait;
use tracing::debug;

use super::AlertSink;
use crate::errors::MonitorError;
use crate::types::SustainedFailureAlert;

/// Alert sink that delivers nowhere. The critical log line is the alert.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAlertSink;

#[async_trait]
impl AlertSink for NoopAlertSink {
    fn name(&self) -> &str {
        "noop"
    }

    async fn send(&self, alert: &SustainedFailureAlert) -> Result<(), MonitorError> {
        debug!(
            consecutive_errors = alert.consecutive_error_count,
            "no alert channel configured"
        );
        Ok(())
    }
}
