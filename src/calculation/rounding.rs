//! Shared decimal helpers for hours and money.

use chrono::TimeDelta;
use rust_decimal::Decimal;

/// Reconciliation tolerance for money totals: one cent.
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Converts a duration to hours, rounded to two decimal places.
///
/// ```
/// use payroll_engine::calculation::duration_hours;
/// use chrono::TimeDelta;
/// use rust_decimal::Decimal;
///
/// assert_eq!(duration_hours(TimeDelta::minutes(200)), Decimal::new(333, 2));
/// ```
pub fn duration_hours(duration: TimeDelta) -> Decimal {
    (Decimal::from(duration.num_minutes()) / Decimal::from(60)).round_dp(2)
}

/// True when two money amounts differ by less than [`MONEY_TOLERANCE`].
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() < MONEY_TOLERANCE
}

/// Sums `terms`, or `None` if any partial sum overflows.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(terms: I) -> Option<Decimal> {
    terms.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}
