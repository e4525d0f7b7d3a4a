//! Process liveness via the OS process table.
//!
//! Windows: `tasklist /FI "IMAGENAME eq <name>"`, alive when the image name
//! shows up in the output. Elsewhere: `pgrep -f <name>`, alive on exit 0.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::ProcessProbe;
use crate::errors::MonitorError;

/// Looks up the trading process by image name or command-line pattern.
pub struct ProcessTableProbe {
    process_name: String,
}

impl ProcessTableProbe {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
        }
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    #[cfg(windows)]
    async fn query(&self) -> Result<bool, MonitorError> {
        let output = Command::new("tasklist")
            .arg("/FI")
            .arg(format!("IMAGENAME eq {}", self.process_name))
            .arg("/NH")
            .output()
            .await
            .map_err(|e| MonitorError::Check {
                reason: format!("failed to run tasklist: {e}"),
            })?;

        if !output.status.success() {
            return Err(MonitorError::Check {
                reason: format!("tasklist exited with {}", output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(tasklist_lists_image(&stdout, &self.process_name))
    }

    #[cfg(not(windows))]
    async fn query(&self) -> Result<bool, MonitorError> {
        let status = Command::new("pgrep")
            .arg("-f")
            .arg(&self.process_name)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| MonitorError::Check {
                reason: format!("failed to run pgrep: {e}"),
            })?;

        match status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(MonitorError::Check {
                reason: format!("pgrep exited with {status}"),
            }),
        }
    }
}

#[async_trait]
impl ProcessProbe for ProcessTableProbe {
    fn name(&self) -> &str {
        "process-table"
    }

    async fn is_alive(&self) -> Result<bool, MonitorError> {
        let alive = self.query().await?;
        debug!(process = %self.process_name, alive, "process table queried");
        Ok(alive)
    }
}

/// Whether `tasklist` output contains a row for `image_name`.
///
/// With no match tasklist prints an informational line instead of a table,
/// so a case-insensitive row prefix match is enough.
pub fn tasklist_lists_image(stdout: &str, image_name: &str) -> bool {
    let needle = image_name.to_ascii_lowercase();
    stdout
        .lines()
        .map(|line| line.trim_start().to_ascii_lowercase())
        .any(|line| line.starts_with(&needle))
}
