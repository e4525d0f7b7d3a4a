//! Health evaluator: compares consecutive account snapshots.
//!
//! Everything here is a pure function of its inputs. The monitoring loop owns
//! the previous snapshot and hands both snapshots in by reference; nothing in
//! this module reads or mutates `HealthState`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::Thresholds;
use crate::types::{AccountSnapshot, Classification, SnapshotDelta};

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero (the percentage is undefined) or the
/// result does not fit in a `Decimal`.
pub fn pct_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)
        .and_then(|diff| diff.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
}

/// Equity and balance deltas between two snapshots.
pub fn snapshot_delta(previous: &AccountSnapshot, current: &AccountSnapshot) -> SnapshotDelta {
    SnapshotDelta {
        equity_change_pct: pct_change(previous.equity, current.equity),
        balance_change_pct: pct_change(previous.balance, current.balance),
    }
}

/// Classify an equity change. Both checks are independent: a deep drawdown
/// is also a significant move.
pub fn classify_equity_change(
    equity_change_pct: Decimal,
    thresholds: &Thresholds,
) -> Vec<Classification> {
    let mut out = Vec::new();
    if equity_change_pct.abs() > thresholds.significant_move_pct {
        out.push(Classification::SignificantMove);
    }
    if equity_change_pct < thresholds.critical_drawdown_pct {
        out.push(Classification::CriticalDrawdown);
    }
    out
}

/// Whether the margin level signals margin-call risk.
///
/// An absent margin level means no open exposure, hence no risk.
pub fn is_margin_call_risk(margin_level: Option<Decimal>, thresholds: &Thresholds) -> bool {
    margin_level.is_some_and(|level| level < thresholds.margin_call_level_pct)
}

/// Evaluate the current snapshot against the previous one.
///
/// Without a previous snapshot only the margin check runs. An empty result is
/// a nominal cycle.
pub fn evaluate(
    previous: Option<&AccountSnapshot>,
    current: &AccountSnapshot,
    thresholds: &Thresholds,
) -> Vec<Classification> {
    let mut classifications = previous
        .and_then(|prev| pct_change(prev.equity, current.equity))
        .map(|pct| classify_equity_change(pct, thresholds))
        .unwrap_or_default();

    if is_margin_call_risk(current.margin_level, thresholds) {
        classifications.push(Classification::MarginCallRisk);
    }

    classifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snap(equity: Decimal, margin_level: Option<Decimal>) -> AccountSnapshot {
        AccountSnapshot {
            balance: equity,
            equity,
            unrealized_profit: Decimal::ZERO,
            margin_level,
            timestamp: 0,
        }
    }

    fn defaults() -> Thresholds {
        Thresholds::default()
    }

    // -----------------------------------------------------------------------
    // pct_change
    // -----------------------------------------------------------------------

    #[test]
    fn test_pct_change_basic() {
        assert_eq!(pct_change(dec!(10000), dec!(9400)), Some(dec!(-6)));
        assert_eq!(pct_change(dec!(10000), dec!(10500)), Some(dec!(5)));
    }

    #[test]
    fn test_pct_change_zero_previous_is_undefined() {
        assert_eq!(pct_change(Decimal::ZERO, dec!(100)), None);
    }

    #[test]
    fn test_pct_change_overflow_is_undefined() {
        let huge = dec!(70_000_000_000_000_000_000_000_000_000);
        assert_eq!(pct_change(-huge, huge), None);
        assert_eq!(pct_change(huge, -huge), None);
    }

    #[test]
    fn test_snapshot_delta_reports_balance_too() {
        let prev = AccountSnapshot {
            balance: dec!(2000),
            ..snap(dec!(10000), None)
        };
        let cur = AccountSnapshot {
            balance: dec!(2200),
            ..snap(dec!(9000), None)
        };
        let delta = snapshot_delta(&prev, &cur);
        assert_eq!(delta.equity_change_pct, Some(dec!(-10)));
        assert_eq!(delta.balance_change_pct, Some(dec!(10)));
    }

    // -----------------------------------------------------------------------
    // evaluate
    // -----------------------------------------------------------------------

    #[test]
    fn test_first_cycle_has_no_change_classification() {
        let cur = snap(dec!(5000), Some(dec!(400)));
        assert!(evaluate(None, &cur, &defaults()).is_empty());
    }

    #[test]
    fn test_first_cycle_still_checks_margin() {
        let cur = snap(dec!(5000), Some(dec!(80)));
        assert_eq!(
            evaluate(None, &cur, &defaults()),
            vec![Classification::MarginCallRisk]
        );
    }

    #[test]
    fn test_six_percent_drop_is_significant_only() {
        let prev = snap(dec!(10000), None);
        let cur = snap(dec!(9400), None);
        assert_eq!(
            evaluate(Some(&prev), &cur, &defaults()),
            vec![Classification::SignificantMove]
        );
    }

    #[test]
    fn test_eleven_percent_drop_is_significant_and_critical() {
        let prev = snap(dec!(10000), None);
        let cur = snap(dec!(8900), None);
        let result = evaluate(Some(&prev), &cur, &defaults());
        assert!(result.contains(&Classification::SignificantMove));
        assert!(result.contains(&Classification::CriticalDrawdown));
        assert!(!result.contains(&Classification::MarginCallRisk));
    }

    #[test]
    fn test_large_gain_is_significant_not_drawdown() {
        let prev = snap(dec!(10000), None);
        let cur = snap(dec!(12000), None);
        assert_eq!(
            evaluate(Some(&prev), &cur, &defaults()),
            vec![Classification::SignificantMove]
        );
    }

    #[test]
    fn test_boundaries_are_strict() {
        // exactly 5 % is not a significant move
        let prev = snap(dec!(10000), None);
        assert!(evaluate(Some(&prev), &snap(dec!(9500), None), &defaults()).is_empty());
        // exactly -10 % is significant but not a critical drawdown
        assert_eq!(
            evaluate(Some(&prev), &snap(dec!(9000), None), &defaults()),
            vec![Classification::SignificantMove]
        );
        // exactly 100 % margin level is not at risk
        assert!(evaluate(None, &snap(dec!(1), Some(dec!(100))), &defaults()).is_empty());
    }

    #[test]
    fn test_margin_risk_regardless_of_equity_change() {
        let prev = snap(dec!(10000), None);
        let flat = snap(dec!(10000), Some(dec!(95)));
        assert_eq!(
            evaluate(Some(&prev), &flat, &defaults()),
            vec![Classification::MarginCallRisk]
        );

        let crash = snap(dec!(8000), Some(dec!(95)));
        let result = evaluate(Some(&prev), &crash, &defaults());
        assert_eq!(result.len(), 3);
        assert!(result.contains(&Classification::MarginCallRisk));
    }

    #[test]
    fn test_undefined_margin_level_is_no_risk() {
        let cur = snap(dec!(10000), None);
        assert!(!is_margin_call_risk(cur.margin_level, &defaults()));
        assert!(evaluate(None, &cur, &defaults()).is_empty());
    }

    #[test]
    fn test_zero_previous_equity_skips_change() {
        let prev = snap(Decimal::ZERO, None);
        let cur = snap(dec!(10000), Some(dec!(50)));
        assert_eq!(
            evaluate(Some(&prev), &cur, &defaults()),
            vec![Classification::MarginCallRisk]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            significant_move_pct: dec!(2),
            critical_drawdown_pct: dec!(-3),
            margin_call_level_pct: dec!(200),
        };
        let prev = snap(dec!(10000), None);
        let cur = snap(dec!(9650), Some(dec!(150)));
        assert_eq!(
            evaluate(Some(&prev), &cur, &thresholds),
            vec![
                Classification::SignificantMove,
                Classification::CriticalDrawdown,
                Classification::MarginCallRisk,
            ]
        );
    }

    // -----------------------------------------------------------------------
    // proptest
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn no_previous_never_yields_change_classifications(
            equity in 0i64..10_000_000i64,
            margin in proptest::option::of(0i64..100_000i64),
        ) {
            let cur = snap(Decimal::from(equity), margin.map(Decimal::from));
            let result = evaluate(None, &cur, &defaults());
            prop_assert!(!result.contains(&Classification::SignificantMove));
            prop_assert!(!result.contains(&Classification::CriticalDrawdown));
            prop_assert!(result.iter().all(|c| *c == Classification::MarginCallRisk));
        }

        #[test]
        fn evaluate_is_deterministic(
            prev_equity in 1i64..10_000_000i64,
            cur_equity in 0i64..10_000_000i64,
            margin in proptest::option::of(0i64..100_000i64),
        ) {
            let prev = snap(Decimal::from(prev_equity), None);
            let cur = snap(Decimal::from(cur_equity), margin.map(Decimal::from));
            let first = evaluate(Some(&prev), &cur, &defaults());
            let second = evaluate(Some(&prev), &cur, &defaults());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn critical_drawdown_implies_significant_move(
            prev_equity in 1i64..10_000_000i64,
            cur_equity in 0i64..10_000_000i64,
        ) {
            let prev = snap(Decimal::from(prev_equity), None);
            let cur = snap(Decimal::from(cur_equity), None);
            let result = evaluate(Some(&prev), &cur, &defaults());
            if result.contains(&Classification::CriticalDrawdown) {
                prop_assert!(result.contains(&Classification::SignificantMove));
            }
        }
    }
}
