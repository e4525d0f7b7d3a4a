//! Scripted collaborators: replay a fixed sequence of results.
//!
//! Each call consumes the next scripted step; once the script is exhausted the
//! last step repeats. Used to drive the monitoring loop without a terminal.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{AccountSource, ProcessProbe};
use crate::errors::MonitorError;
use crate::types::AccountSnapshot;

/// Pick the step for call number `call`, repeating the last one.
fn step_at<T>(steps: &[T], call: usize) -> Option<&T> {
    steps.get(call).or_else(|| steps.last())
}

/// Account source returning scripted snapshots or capture failures.
pub struct ScriptedAccountSource {
    steps: Vec<Result<AccountSnapshot, String>>,
    calls: AtomicUsize,
}

impl ScriptedAccountSource {
    pub fn new(steps: Vec<Result<AccountSnapshot, String>>) -> Self {
        Self {
            steps,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(snapshot: AccountSnapshot) -> Self {
        Self::new(vec![Ok(snapshot)])
    }

    pub fn always_failing(reason: impl Into<String>) -> Self {
        Self::new(vec![Err(reason.into())])
    }

    /// Number of captures performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountSource for ScriptedAccountSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn capture(&self) -> Result<AccountSnapshot, MonitorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match step_at(&self.steps, call) {
            Some(Ok(snapshot)) => Ok(snapshot.clone()),
            Some(Err(reason)) => Err(MonitorError::Capture {
                reason: reason.clone(),
            }),
            None => Err(MonitorError::Capture {
                reason: "empty script".into(),
            }),
        }
    }
}

/// Process probe returning scripted liveness results.
pub struct ScriptedProcessProbe {
    steps: Vec<Result<bool, String>>,
    calls: AtomicUsize,
}

impl ScriptedProcessProbe {
    pub fn new(steps: Vec<Result<bool, String>>) -> Self {
        Self {
            steps,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(alive: bool) -> Self {
        Self::new(vec![Ok(alive)])
    }

    pub fn always_failing(reason: impl Into<String>) -> Self {
        Self::new(vec![Err(reason.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessProbe for ScriptedProcessProbe {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_alive(&self) -> Result<bool, MonitorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match step_at(&self.steps, call) {
            Some(Ok(alive)) => Ok(*alive),
            Some(Err(reason)) => Err(MonitorError::Check {
                reason: reason.clone(),
            }),
            None => Err(MonitorError::Check {
                reason: "empty script".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_account_script_repeats_last_step() {
        let snap = AccountSnapshot::new(dec!(100), dec!(100), dec!(0), None);
        let source = ScriptedAccountSource::new(vec![Err("offline".into()), Ok(snap.clone())]);

        assert!(source.capture().await.is_err());
        assert_eq!(source.capture().await.unwrap(), snap);
        assert_eq!(source.capture().await.unwrap(), snap);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_probe_script() {
        let probe = ScriptedProcessProbe::new(vec![Ok(true), Ok(false), Err("denied".into())]);
        assert!(probe.is_alive().await.unwrap());
        assert!(!probe.is_alive().await.unwrap());
        let err = probe.is_alive().await.unwrap_err();
        assert!(matches!(err, MonitorError::Check { .. }));
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let source = ScriptedAccountSource::new(Vec::new());
        assert!(source.capture().await.is_err());
    }
}
