//! Attendance aggregation.
//!
//! Turns the daily attendance rows of one employee for one period into the
//! monthly [`AttendanceSummary`]: worked hours, late and early-leave
//! occurrences, absences, leave hours and four mutually exclusive overtime
//! buckets.
//!
//! Each day is evaluated on its own by [`evaluate_day`]. Overtime for a day
//! goes entirely to the bucket picked by [`AttendanceDay::day_kind`], so at
//! most one bucket is non-zero per day.

use chrono::{NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollSettings;
use crate::models::{AttendanceDay, AttendanceSummary, DayKind, PayrollPeriod};

use super::rounding::duration_hours;

/// The evaluation of a single attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    /// Overtime bucket the day falls in.
    pub day_kind: DayKind,
    /// Scheduled hours for the day, after approved leave.
    pub expected_hours: Decimal,
    /// Hours worked after lunch-break deduction. Off-site days count as
    /// fully attended.
    pub worked_hours: Decimal,
    /// Minutes clocked in after the standard check-in.
    pub late_minutes: i64,
    /// Minutes clocked out before the standard check-out.
    pub early_leave_minutes: i64,
    /// Hours worked past the standard check-out.
    pub overtime_hours: Decimal,
    /// Scheduled hours not worked.
    pub absence_hours: Decimal,
    /// Scheduled day on which no time was worked.
    pub is_absent: bool,
}

impl DailyAttendance {
    /// True when the day had scheduled hours.
    pub fn is_scheduled(&self) -> bool {
        self.expected_hours > Decimal::ZERO
    }
}

/// Evaluates one attendance row.
///
/// # Rules
///
/// - Worked time is `check_out - check_in`, plus 24 hours when the shift
///   crossed midnight. The lunch break is deducted only when the worked time
///   exceeds it.
/// - Expected hours are zero on a holiday unless it is a compensatory
///   working day, otherwise the standard daily hours less approved leave.
/// - Late and early-leave minutes are assessed only on scheduled days.
/// - Overtime is the part of the shift after the standard check-out.
/// - Business-trip and field-work days count as fully attended: no late,
///   early-leave or absence is assessed.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::evaluate_day;
/// use payroll_engine::config::PayrollSettings;
/// use payroll_engine::models::AttendanceDay;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = AttendanceDay {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
///     day_of_week: 1,
///     check_in: NaiveTime::from_hms_opt(9, 5, 0),
///     check_out: NaiveTime::from_hms_opt(18, 0, 0),
///     is_holiday: false,
///     is_compensatory_leave: false,
///     is_business_trip: false,
///     is_field_work: false,
///     leave_hours: Decimal::ZERO,
///     leave_type: None,
/// };
///
/// let daily = evaluate_day(&day, &PayrollSettings::default());
/// assert_eq!(daily.late_minutes, 5);
/// assert_eq!(daily.overtime_hours, Decimal::ZERO);
/// ```
pub fn evaluate_day(day: &AttendanceDay, settings: &PayrollSettings) -> DailyAttendance {
    let day_kind = day.day_kind();

    let expected_hours = if day.is_holiday && !day.is_compensatory_leave {
        Decimal::ZERO
    } else {
        (settings.standard_daily_hours - day.leave_hours).max(Decimal::ZERO)
    };
    let scheduled = expected_hours > Decimal::ZERO;

    if day.is_off_site() {
        return DailyAttendance {
            day_kind,
            expected_hours,
            worked_hours: expected_hours,
            late_minutes: 0,
            early_leave_minutes: 0,
            overtime_hours: overtime_hours(day, settings.standard_check_out),
            absence_hours: Decimal::ZERO,
            is_absent: false,
        };
    }

    let worked_hours = worked_duration(day, settings.lunch_break_minutes)
        .map(duration_hours)
        .unwrap_or(Decimal::ZERO);

    let late_minutes = match day.check_in {
        Some(check_in) if scheduled => minutes_after(check_in, settings.standard_check_in),
        _ => 0,
    };

    let early_leave_minutes = match (day.check_in, day.check_out) {
        (Some(check_in), Some(check_out)) if scheduled && check_out >= check_in => {
            minutes_after(settings.standard_check_out, check_out)
        }
        (None, Some(check_out)) if scheduled => minutes_after(settings.standard_check_out, check_out),
        _ => 0,
    };

    DailyAttendance {
        day_kind,
        expected_hours,
        worked_hours,
        late_minutes,
        early_leave_minutes,
        overtime_hours: overtime_hours(day, settings.standard_check_out),
        absence_hours: (expected_hours - worked_hours).max(Decimal::ZERO),
        is_absent: scheduled && worked_hours.is_zero(),
    }
}

/// Aggregates an employee's attendance rows for a period.
///
/// Rows for other employees or outside the period are ignored.
pub fn aggregate_attendance(
    days: &[AttendanceDay],
    employee_id: &str,
    period: PayrollPeriod,
    settings: &PayrollSettings,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();

    for day in days
        .iter()
        .filter(|d| d.employee_id == employee_id && period.contains(d.date))
    {
        let daily = evaluate_day(day, settings);

        if daily.is_scheduled() {
            summary.expected_work_days += 1;
            if daily.is_absent {
                summary.absence_days += 1;
            } else {
                summary.actual_work_days += 1;
            }
        }
        if daily.late_minutes > 0 {
            summary.late_count += 1;
            summary.late_minutes += daily.late_minutes;
        }
        if daily.early_leave_minutes > 0 {
            summary.early_leave_count += 1;
            summary.early_leave_minutes += daily.early_leave_minutes;
        }
        if day.leave_hours > Decimal::ZERO {
            summary.leave_hours.add(day.leave_type, day.leave_hours);
        }

        summary.expected_work_hours += daily.expected_hours;
        summary.actual_work_hours += daily.worked_hours;
        summary.absence_hours += daily.absence_hours;
        summary.overtime_hours.add(daily.day_kind, daily.overtime_hours);
    }

    tracing::debug!(
        employee_id,
        period = %period,
        expected_days = summary.expected_work_days,
        actual_days = summary.actual_work_days,
        overtime_hours = %summary.overtime_hours.total(),
        "Aggregated attendance"
    );

    summary
}

/// Worked time after lunch deduction, when both punches are present.
fn worked_duration(day: &AttendanceDay, lunch_break_minutes: i64) -> Option<TimeDelta> {
    let (check_in, check_out) = (day.check_in?, day.check_out?);
    let raw = shift_length(check_in, check_out);
    let lunch = TimeDelta::minutes(lunch_break_minutes);

    Some(if raw > lunch { raw - lunch } else { raw })
}

/// Overtime hours: the part of the shift after the standard check-out.
fn overtime_hours(day: &AttendanceDay, standard_check_out: NaiveTime) -> Decimal {
    let (Some(check_in), Some(check_out)) = (day.check_in, day.check_out) else {
        return Decimal::ZERO;
    };

    let start = since_midnight(check_in);
    let end = start + shift_length(check_in, check_out);
    let threshold = since_midnight(standard_check_out).max(start);

    if end > threshold {
        duration_hours(end - threshold)
    } else {
        Decimal::ZERO
    }
}

/// `check_out - check_in`, adding a day when the shift crossed midnight.
fn shift_length(check_in: NaiveTime, check_out: NaiveTime) -> TimeDelta {
    let raw = check_out.signed_duration_since(check_in);
    if raw < TimeDelta::zero() {
        raw + TimeDelta::days(1)
    } else {
        raw
    }
}

fn since_midnight(time: NaiveTime) -> TimeDelta {
    time.signed_duration_since(NaiveTime::MIN)
}

/// Whole minutes `later` is past `earlier`, or zero.
fn minutes_after(later: NaiveTime, earlier: NaiveTime) -> i64 {
    later.signed_duration_since(earlier).num_minutes().max(0)
}
