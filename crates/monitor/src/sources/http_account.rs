//! Account source backed by the trading terminal's HTTP bridge.
//!
//! The bridge runs next to the terminal and serves `GET /account` with the
//! terminal's raw account-info fields as JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::AccountSource;
use crate::errors::MonitorError;
use crate::types::AccountSnapshot;

/// Raw account-info payload as reported by the terminal.
#[derive(Debug, Deserialize)]
pub struct AccountInfoResponse {
    #[serde(default)]
    pub login: Option<u64>,
    pub balance: Decimal,
    pub equity: Decimal,
    pub profit: Decimal,
    /// Used margin. Zero when nothing is open.
    #[serde(default)]
    pub margin: Option<Decimal>,
    #[serde(default)]
    pub margin_level: Option<Decimal>,
}

impl AccountInfoResponse {
    /// Convert into a snapshot.
    ///
    /// The terminal reports a margin level of 0 when no margin is in use;
    /// that is mapped to an absent margin level, not to maximum risk.
    pub fn into_snapshot(self) -> AccountSnapshot {
        let no_exposure = self.margin.is_some_and(|m| m <= Decimal::ZERO);
        let margin_level = if no_exposure {
            None
        } else {
            self.margin_level.filter(|lvl| !lvl.is_zero())
        };
        AccountSnapshot::new(self.balance, self.equity, self.profit, margin_level)
    }
}

/// HTTP client for the terminal bridge.
pub struct HttpAccountSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAccountSource {
    /// Create a new source.
    ///
    /// `timeout` bounds the whole request; a timed-out request is a failed
    /// capture.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(10)))
            .build()
            .map_err(|e| MonitorError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn account_url(&self) -> String {
        format!("{}/account", self.base_url)
    }
}

#[async_trait]
impl AccountSource for HttpAccountSource {
    fn name(&self) -> &str {
        "http-bridge"
    }

    async fn capture(&self) -> Result<AccountSnapshot, MonitorError> {
        let response = self
            .client
            .get(self.account_url())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MonitorError::Timeout {
                        operation: "account capture".into(),
                        seconds: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    MonitorError::Capture {
                        reason: format!("terminal bridge unreachable: {e}"),
                    }
                } else {
                    MonitorError::Capture {
                        reason: format!("account request failed: {e}"),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MonitorError::Capture {
                reason: format!("terminal bridge returned {status}: {body}"),
            });
        }

        let info = response.json::<AccountInfoResponse>().await?;

        debug!(login = ?info.login, "account info received");

        Ok(info.into_snapshot())
    }
}
