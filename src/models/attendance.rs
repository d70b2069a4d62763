//! Daily attendance model.
//!
//! One [`AttendanceDay`] row exists per employee per calendar day. Rows are
//! read-only inputs to the aggregator.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of approved leave taken on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave.
    Annual,
    /// Sick leave, partially paid.
    Sick,
    /// Unpaid personal leave.
    Personal,
    /// Any other leave type.
    Other,
}

/// The overtime category of a calendar day.
///
/// Exactly one kind applies to a day, chosen by priority:
/// holiday, then Saturday, then Sunday, then an ordinary workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Monday to Friday, not a holiday.
    Workday,
    /// Day of week 6.
    Saturday,
    /// Day of week 7.
    Sunday,
    /// A holiday, whatever its day of week.
    Holiday,
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Workday => write!(f, "Workday"),
            DayKind::Saturday => write!(f, "Saturday"),
            DayKind::Sunday => write!(f, "Sunday"),
            DayKind::Holiday => write!(f, "Holiday"),
        }
    }
}

/// One employee's attendance on one calendar day.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceDay, DayKind};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = AttendanceDay {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
///     day_of_week: 6,
///     check_in: NaiveTime::from_hms_opt(9, 0, 0),
///     check_out: NaiveTime::from_hms_opt(20, 0, 0),
///     is_holiday: false,
///     is_compensatory_leave: false,
///     is_business_trip: false,
///     is_field_work: false,
///     leave_hours: Decimal::ZERO,
///     leave_type: None,
/// };
/// assert_eq!(day.day_kind(), DayKind::Saturday);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    /// The employee this row belongs to.
    pub employee_id: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// Day of week, 1 (Monday) to 7 (Sunday).
    pub day_of_week: u8,
    /// Clock-in time, if the employee clocked in.
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    /// Clock-out time; earlier than `check_in` when the shift crossed midnight.
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    /// The day is a holiday.
    #[serde(default)]
    pub is_holiday: bool,
    /// A holiday that is worked in exchange for another day off.
    #[serde(default)]
    pub is_compensatory_leave: bool,
    /// The employee was on a business trip.
    #[serde(default)]
    pub is_business_trip: bool,
    /// The employee was doing field work.
    #[serde(default)]
    pub is_field_work: bool,
    /// Approved leave hours taken on this day.
    #[serde(default)]
    pub leave_hours: Decimal,
    /// The kind of leave taken, when `leave_hours` is non-zero.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
}

impl AttendanceDay {
    /// The overtime category of this day.
    pub fn day_kind(&self) -> DayKind {
        if self.is_holiday {
            DayKind::Holiday
        } else {
            match self.day_of_week {
                6 => DayKind::Saturday,
                7 => DayKind::Sunday,
                _ => DayKind::Workday,
            }
        }
    }

    /// True when the employee worked away from the office all day.
    pub fn is_off_site(&self) -> bool {
        self.is_business_trip || self.is_field_work
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(day_of_week: u8, is_holiday: bool) -> AttendanceDay {
        AttendanceDay {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            day_of_week,
            check_in: None,
            check_out: None,
            is_holiday,
            is_compensatory_leave: false,
            is_business_trip: false,
            is_field_work: false,
            leave_hours: Decimal::ZERO,
            leave_type: None,
        }
    }

    #[test]
    fn test_holiday_takes_priority_over_weekend() {
        assert_eq!(day(6, true).day_kind(), DayKind::Holiday);
        assert_eq!(day(7, true).day_kind(), DayKind::Holiday);
        assert_eq!(day(3, true).day_kind(), DayKind::Holiday);
    }

    #[test]
    fn test_weekend_and_workday_kinds() {
        assert_eq!(day(6, false).day_kind(), DayKind::Saturday);
        assert_eq!(day(7, false).day_kind(), DayKind::Sunday);
        assert_eq!(day(1, false).day_kind(), DayKind::Workday);
        assert_eq!(day(5, false).day_kind(), DayKind::Workday);
    }

    #[test]
    fn test_deserialize_attendance_row() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2024-03-04",
            "day_of_week": 1,
            "check_in": "09:05:00",
            "check_out": "18:00:00",
            "leave_hours": "2",
            "leave_type": "sick"
        }"#;

        let row: AttendanceDay = serde_json::from_str(json).unwrap();
        assert_eq!(row.check_in, NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(row.leave_type, Some(LeaveType::Sick));
        assert!(!row.is_holiday);
        assert!(!row.is_off_site());
    }
}
