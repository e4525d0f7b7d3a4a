use thiserror::Error;

/// Typed error hierarchy for the trade monitor.
///
/// Collaborator failures (`Capture`, `Check`, `Timeout`) are never fatal: the
/// monitoring loop folds them into the error counter. Application code wraps
/// with `anyhow::Context` for propagation.
#[derive(Error, Debug)]
pub enum MonitorError {
    // -- Collaborators ------------------------------------------------------
    #[error("account capture failed: {reason}")]
    Capture { reason: String },

    #[error("process check failed: {reason}")]
    Check { reason: String },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    // -- Alerting -----------------------------------------------------------
    #[error("alert delivery failed: {reason}")]
    AlertDelivery { reason: String },

    // -- Configuration ------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),

    // -- Forwarded errors ---------------------------------------------------
    /// Body of a successful bridge response that does not decode.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}
