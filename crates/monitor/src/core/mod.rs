pub mod health_evaluator;
pub mod monitor;
