//! Overtime pay and attendance deductions.
//!
//! Prices the hours and occurrences in an [`AttendanceSummary`] using the
//! employee's hourly rate and the configured multipliers, per-occurrence
//! deductions and leave ratios.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollSettings;
use crate::models::{AttendanceSummary, DayKind, LeaveType, OvertimeBuckets};

const DAY_KINDS: [DayKind; 4] = [
    DayKind::Workday,
    DayKind::Saturday,
    DayKind::Sunday,
    DayKind::Holiday,
];

const LEAVE_TYPES: [LeaveType; 4] = [
    LeaveType::Annual,
    LeaveType::Sick,
    LeaveType::Personal,
    LeaveType::Other,
];

/// Money amounts derived from attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePayResult {
    /// Hourly rate the amounts were priced at.
    pub hourly_rate: Decimal,
    /// Overtime pay by bucket.
    pub overtime_pay: OvertimeBuckets,
    /// Sum of the overtime pay buckets.
    pub overtime_pay_total: Decimal,
    /// `late_count * late_per_occurrence`.
    pub late_deduction: Decimal,
    /// `early_leave_count * early_leave_per_occurrence`.
    pub early_leave_deduction: Decimal,
    /// `absence_hours * hourly_rate`.
    pub absence_deduction: Decimal,
    /// `Σ leave hours * hourly_rate * ratio`, per leave type.
    pub leave_deduction: Decimal,
    /// Full-attendance bonus, when earned.
    pub attendance_bonus: Decimal,
}

/// Hourly rate: `basic_salary_total / monthly_standard_hours`, rounded to
/// cents.
///
/// ```
/// use payroll_engine::calculation::hourly_rate;
/// use payroll_engine::config::PayrollSettings;
/// use rust_decimal::Decimal;
///
/// let rate = hourly_rate(Decimal::new(6000, 0), &PayrollSettings::default());
/// assert_eq!(rate, Decimal::new(3448, 2));
/// ```
pub fn hourly_rate(basic_salary_total: Decimal, settings: &PayrollSettings) -> Decimal {
    if settings.monthly_standard_hours <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    settings.round_money(basic_salary_total / settings.monthly_standard_hours)
}

/// True when the period had scheduled days and no late arrival, early
/// departure or absence.
pub fn earns_full_attendance(summary: &AttendanceSummary) -> bool {
    summary.expected_work_days > 0
        && summary.late_count == 0
        && summary.early_leave_count == 0
        && summary.absence_days == 0
        && summary.absence_hours.is_zero()
}

/// Prices an attendance summary.
///
/// Each amount is rounded to cents on its own; overtime and leave are
/// rounded per bucket before summing.
pub fn calculate_attendance_pay(
    summary: &AttendanceSummary,
    basic_salary_total: Decimal,
    settings: &PayrollSettings,
) -> AttendancePayResult {
    let rate = hourly_rate(basic_salary_total, settings);

    let mut overtime_pay = OvertimeBuckets::default();
    for kind in DAY_KINDS {
        let hours = summary.overtime_hours.get(kind);
        if hours > Decimal::ZERO {
            let multiplier = settings.overtime_multipliers.for_kind(kind);
            overtime_pay.add(kind, settings.round_money(hours * rate * multiplier));
        }
    }

    let leave_deduction: Decimal = LEAVE_TYPES
        .iter()
        .map(|leave_type| {
            let hours = leave_hours(summary, *leave_type);
            let ratio = settings.leave_deduction_ratios.for_type(*leave_type);
            settings.round_money(hours * rate * ratio)
        })
        .sum();

    let attendance_bonus = if earns_full_attendance(summary) {
        settings.full_attendance_bonus
    } else {
        Decimal::ZERO
    };

    AttendancePayResult {
        hourly_rate: rate,
        overtime_pay_total: overtime_pay.total(),
        overtime_pay,
        late_deduction: settings
            .round_money(Decimal::from(summary.late_count) * settings.late_deduction_per_occurrence),
        early_leave_deduction: settings.round_money(
            Decimal::from(summary.early_leave_count) * settings.early_leave_deduction_per_occurrence,
        ),
        absence_deduction: settings.round_money(summary.absence_hours * rate),
        leave_deduction,
        attendance_bonus,
    }
}

fn leave_hours(summary: &AttendanceSummary, leave_type: LeaveType) -> Decimal {
    match leave_type {
        LeaveType::Annual => summary.leave_hours.annual,
        LeaveType::Sick => summary.leave_hours.sick,
        LeaveType::Personal => summary.leave_hours.personal,
        LeaveType::Other => summary.leave_hours.other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveHours;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn clean_month() -> AttendanceSummary {
        AttendanceSummary {
            expected_work_days: 21,
            actual_work_days: 21,
            expected_work_hours: dec("168"),
            actual_work_hours: dec("168"),
            ..AttendanceSummary::default()
        }
    }

    #[test]
    fn test_hourly_rate_rounds_to_cents() {
        let settings = PayrollSettings::default();
        assert_eq!(hourly_rate(dec("8700"), &settings), dec("50"));
        assert_eq!(hourly_rate(dec("6000"), &settings), dec("34.48"));
    }

    // PAY-001: overtime priced per bucket
    #[test]
    fn test_overtime_pay_per_bucket() {
        let mut summary = clean_month();
        summary.overtime_hours = OvertimeBuckets {
            regular: dec("4"),
            saturday: dec("2"),
            sunday: Decimal::ZERO,
            holiday: dec("1"),
        };

        let result = calculate_attendance_pay(&summary, dec("8700"), &PayrollSettings::default());

        assert_eq!(result.hourly_rate, dec("50"));
        assert_eq!(result.overtime_pay.regular, dec("300"));
        assert_eq!(result.overtime_pay.saturday, dec("200"));
        assert_eq!(result.overtime_pay.sunday, Decimal::ZERO);
        assert_eq!(result.overtime_pay.holiday, dec("150"));
        assert_eq!(result.overtime_pay_total, dec("650"));
    }

    // PAY-002: occurrence and hour based deductions
    #[test]
    fn test_attendance_deductions() {
        let mut summary = clean_month();
        summary.late_count = 2;
        summary.early_leave_count = 1;
        summary.absence_days = 1;
        summary.absence_hours = dec("8");
        summary.leave_hours = LeaveHours {
            annual: dec("8"),
            sick: dec("10"),
            personal: dec("4"),
            other: Decimal::ZERO,
        };

        let result = calculate_attendance_pay(&summary, dec("8700"), &PayrollSettings::default());

        assert_eq!(result.late_deduction, dec("40"));
        assert_eq!(result.early_leave_deduction, dec("20"));
        assert_eq!(result.absence_deduction, dec("400"));
        // annual 0 + sick 10 * 50 * 0.4 + personal 4 * 50 * 1
        assert_eq!(result.leave_deduction, dec("400"));
        assert_eq!(result.attendance_bonus, Decimal::ZERO);
    }

    // PAY-003: full-attendance bonus
    #[test]
    fn test_full_attendance_bonus() {
        let settings = PayrollSettings {
            full_attendance_bonus: dec("200"),
            ..PayrollSettings::default()
        };

        let result = calculate_attendance_pay(&clean_month(), dec("8700"), &settings);
        assert_eq!(result.attendance_bonus, dec("200"));

        let mut late = clean_month();
        late.late_count = 1;
        let result = calculate_attendance_pay(&late, dec("8700"), &settings);
        assert_eq!(result.attendance_bonus, Decimal::ZERO);

        let empty = AttendanceSummary::default();
        assert!(!earns_full_attendance(&empty));
    }

    #[test]
    fn test_zero_summary_prices_to_zero() {
        let result =
            calculate_attendance_pay(&AttendanceSummary::default(), dec("5000"), &PayrollSettings::default());
        assert_eq!(result.overtime_pay_total, Decimal::ZERO);
        assert_eq!(result.late_deduction, Decimal::ZERO);
        assert_eq!(result.absence_deduction, Decimal::ZERO);
        assert_eq!(result.leave_deduction, Decimal::ZERO);
    }
}
