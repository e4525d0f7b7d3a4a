pub mod account;
pub mod health;

pub use account::AccountSnapshot;
pub use health::{
    Classification, CyclePhase, CycleReport, HealthState, Severity, SnapshotDelta,
    SustainedFailureAlert,
};
