use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single consistent read of the account's financial state.
///
/// Either every field was captured at the same instant or the capture failed;
/// sources never hand out a partially populated snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub equity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unrealized_profit: Decimal,
    /// Equity as a percentage of used margin. `None` when nothing is open.
    #[serde(with = "rust_decimal::serde::str_option")]
    pub margin_level: Option<Decimal>,
    /// Unix seconds at capture time.
    pub timestamp: i64,
}

impl AccountSnapshot {
    pub fn new(
        balance: Decimal,
        equity: Decimal,
        unrealized_profit: Decimal,
        margin_level: Option<Decimal>,
    ) -> Self {
        Self {
            balance,
            equity,
            unrealized_profit,
            margin_level,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
