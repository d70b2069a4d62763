//! Typed payroll settings.
//!
//! [`PayrollSettings`] is read once from a [`ConfigProvider`] by string key.
//! Absent keys fall back to the defaults listed on each constant in [`keys`].

use chrono::NaiveTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DayKind, LeaveType, RuleValue};

use super::ConfigProvider;

/// Configuration keys read by [`PayrollSettings::from_provider`].
pub mod keys {
    /// Standard clock-in time, text `HH:MM`. Default `09:00`.
    pub const STANDARD_CHECK_IN: &str = "attendance.standard_check_in";
    /// Standard clock-out time, text `HH:MM`. Default `18:00`.
    pub const STANDARD_CHECK_OUT: &str = "attendance.standard_check_out";
    /// Lunch break in whole minutes. Default `60`.
    pub const LUNCH_BREAK_MINUTES: &str = "attendance.lunch_break_minutes";
    /// Scheduled hours per working day. Default `8`.
    pub const STANDARD_DAILY_HOURS: &str = "attendance.standard_daily_hours";
    /// Hours per month used to derive the hourly rate. Default `174`.
    pub const MONTHLY_STANDARD_HOURS: &str = "payroll.monthly_standard_hours";
    /// Weekday overtime multiplier. Default `1.5`.
    pub const OVERTIME_REGULAR: &str = "overtime.regular_multiplier";
    /// Saturday overtime multiplier. Default `2.0`.
    pub const OVERTIME_SATURDAY: &str = "overtime.saturday_multiplier";
    /// Sunday overtime multiplier. Default `2.0`.
    pub const OVERTIME_SUNDAY: &str = "overtime.sunday_multiplier";
    /// Holiday overtime multiplier. Default `3.0`.
    pub const OVERTIME_HOLIDAY: &str = "overtime.holiday_multiplier";
    /// Deduction per late arrival. Default `20`.
    pub const LATE_PER_OCCURRENCE: &str = "deduction.late_per_occurrence";
    /// Deduction per early departure. Default `20`.
    pub const EARLY_LEAVE_PER_OCCURRENCE: &str = "deduction.early_leave_per_occurrence";
    /// Share of annual-leave hours deducted. Default `0`.
    pub const LEAVE_RATIO_ANNUAL: &str = "deduction.leave_ratio.annual";
    /// Share of sick-leave hours deducted. Default `0.4`.
    pub const LEAVE_RATIO_SICK: &str = "deduction.leave_ratio.sick";
    /// Share of personal-leave hours deducted. Default `1`.
    pub const LEAVE_RATIO_PERSONAL: &str = "deduction.leave_ratio.personal";
    /// Share of other leave hours deducted. Default `1`.
    pub const LEAVE_RATIO_OTHER: &str = "deduction.leave_ratio.other";
    /// Full-attendance bonus. Default `0` (disabled).
    pub const FULL_ATTENDANCE_BONUS: &str = "bonus.full_attendance";
    /// Gross salary above which a warning is raised. Default `100000`.
    pub const GROSS_WARNING_THRESHOLD: &str = "validation.gross_warning_threshold";
    /// Attendance rate below which a warning is raised. Default `0.5`.
    pub const MIN_ATTENDANCE_RATE: &str = "validation.min_attendance_rate";
    /// Money rounding, text `half_up` or `bankers`. Default `half_up`.
    pub const ROUNDING_MODE: &str = "payroll.rounding_mode";
}

/// How money amounts are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Halves round away from zero.
    #[default]
    HalfUp,
    /// Halves round to the even neighbour.
    Bankers,
}

impl RoundingMode {
    /// The matching `rust_decimal` strategy.
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Rounds to two decimal places.
    ///
    /// ```
    /// use payroll_engine::config::RoundingMode;
    /// use rust_decimal::Decimal;
    ///
    /// let value = Decimal::new(12345, 3); // 12.345
    /// assert_eq!(RoundingMode::HalfUp.round_money(value), Decimal::new(1235, 2));
    /// assert_eq!(RoundingMode::Bankers.round_money(value), Decimal::new(1234, 2));
    /// ```
    pub fn round_money(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(2, self.strategy())
    }

    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "half_up" => Some(RoundingMode::HalfUp),
            "bankers" | "half_even" => Some(RoundingMode::Bankers),
            _ => None,
        }
    }
}

/// Overtime pay multipliers per bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeMultipliers {
    /// Ordinary workdays.
    pub regular: Decimal,
    /// Saturdays.
    pub saturday: Decimal,
    /// Sundays.
    pub sunday: Decimal,
    /// Holidays.
    pub holiday: Decimal,
}

impl OvertimeMultipliers {
    /// The multiplier for a day kind.
    pub fn for_kind(&self, kind: DayKind) -> Decimal {
        match kind {
            DayKind::Workday => self.regular,
            DayKind::Saturday => self.saturday,
            DayKind::Sunday => self.sunday,
            DayKind::Holiday => self.holiday,
        }
    }
}

/// Share of leave hours deducted, per leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDeductionRatios {
    /// Annual leave.
    pub annual: Decimal,
    /// Sick leave.
    pub sick: Decimal,
    /// Personal leave.
    pub personal: Decimal,
    /// Other leave.
    pub other: Decimal,
}

impl LeaveDeductionRatios {
    /// The ratio for a leave type.
    pub fn for_type(&self, leave_type: LeaveType) -> Decimal {
        match leave_type {
            LeaveType::Annual => self.annual,
            LeaveType::Sick => self.sick,
            LeaveType::Personal => self.personal,
            LeaveType::Other => self.other,
        }
    }
}

/// Every configurable value the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Standard clock-in time.
    pub standard_check_in: NaiveTime,
    /// Standard clock-out time.
    pub standard_check_out: NaiveTime,
    /// Lunch break deducted from worked time, in minutes.
    pub lunch_break_minutes: i64,
    /// Scheduled hours per working day.
    pub standard_daily_hours: Decimal,
    /// Hours per month used to derive the hourly rate.
    pub monthly_standard_hours: Decimal,
    /// Overtime pay multipliers.
    pub overtime_multipliers: OvertimeMultipliers,
    /// Deduction per late arrival.
    pub late_deduction_per_occurrence: Decimal,
    /// Deduction per early departure.
    pub early_leave_deduction_per_occurrence: Decimal,
    /// Share of leave hours deducted, per type.
    pub leave_deduction_ratios: LeaveDeductionRatios,
    /// Full-attendance bonus.
    pub full_attendance_bonus: Decimal,
    /// Gross salary above which a warning is raised.
    pub gross_warning_threshold: Decimal,
    /// Attendance rate below which a warning is raised.
    pub min_attendance_rate: Decimal,
    /// Money rounding.
    pub rounding_mode: RoundingMode,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            standard_check_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            standard_check_out: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            lunch_break_minutes: 60,
            standard_daily_hours: Decimal::new(8, 0),
            monthly_standard_hours: Decimal::new(174, 0),
            overtime_multipliers: OvertimeMultipliers {
                regular: Decimal::new(15, 1),
                saturday: Decimal::new(2, 0),
                sunday: Decimal::new(2, 0),
                holiday: Decimal::new(3, 0),
            },
            late_deduction_per_occurrence: Decimal::new(20, 0),
            early_leave_deduction_per_occurrence: Decimal::new(20, 0),
            leave_deduction_ratios: LeaveDeductionRatios {
                annual: Decimal::ZERO,
                sick: Decimal::new(4, 1),
                personal: Decimal::ONE,
                other: Decimal::ONE,
            },
            full_attendance_bonus: Decimal::ZERO,
            gross_warning_threshold: Decimal::new(100_000, 0),
            min_attendance_rate: Decimal::new(5, 1),
            rounding_mode: RoundingMode::HalfUp,
        }
    }
}

impl PayrollSettings {
    /// Reads every setting from a provider, defaulting absent keys.
    ///
    /// Fails with `InvalidConfigValue` when a key is present with the wrong
    /// data type or an unusable value.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::{PayrollSettings, keys};
    /// use payroll_engine::models::RuleValue;
    /// use rust_decimal::Decimal;
    /// use std::collections::HashMap;
    ///
    /// let mut rules = HashMap::new();
    /// rules.insert(
    ///     keys::OVERTIME_HOLIDAY.to_string(),
    ///     RuleValue::Numeric(Decimal::new(4, 0)),
    /// );
    ///
    /// let settings = PayrollSettings::from_provider(&rules).unwrap();
    /// assert_eq!(settings.overtime_multipliers.holiday, Decimal::new(4, 0));
    /// assert_eq!(settings.lunch_break_minutes, 60);
    /// ```
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> EngineResult<Self> {
        let defaults = Self::default();

        let lunch = read_decimal(
            provider,
            keys::LUNCH_BREAK_MINUTES,
            Decimal::from(defaults.lunch_break_minutes),
        )?;
        let lunch_break_minutes = lunch
            .to_i64()
            .filter(|m| *m >= 0 && Decimal::from(*m) == lunch)
            .ok_or_else(|| invalid(keys::LUNCH_BREAK_MINUTES, "expected whole, non-negative minutes"))?;

        let monthly_standard_hours = read_decimal(
            provider,
            keys::MONTHLY_STANDARD_HOURS,
            defaults.monthly_standard_hours,
        )?;
        if monthly_standard_hours <= Decimal::ZERO {
            return Err(invalid(keys::MONTHLY_STANDARD_HOURS, "must be greater than zero"));
        }

        let rounding_mode = match provider.rule_value(keys::ROUNDING_MODE) {
            None => defaults.rounding_mode,
            Some(RuleValue::Text(text)) => RoundingMode::parse(&text).ok_or_else(|| {
                invalid(
                    keys::ROUNDING_MODE,
                    &format!("unknown rounding mode '{}'", text),
                )
            })?,
            Some(other) => return Err(wrong_type(keys::ROUNDING_MODE, "text", &other)),
        };

        Ok(Self {
            standard_check_in: read_time(provider, keys::STANDARD_CHECK_IN, defaults.standard_check_in)?,
            standard_check_out: read_time(provider, keys::STANDARD_CHECK_OUT, defaults.standard_check_out)?,
            lunch_break_minutes,
            standard_daily_hours: read_decimal(
                provider,
                keys::STANDARD_DAILY_HOURS,
                defaults.standard_daily_hours,
            )?,
            monthly_standard_hours,
            overtime_multipliers: OvertimeMultipliers {
                regular: read_decimal(provider, keys::OVERTIME_REGULAR, defaults.overtime_multipliers.regular)?,
                saturday: read_decimal(provider, keys::OVERTIME_SATURDAY, defaults.overtime_multipliers.saturday)?,
                sunday: read_decimal(provider, keys::OVERTIME_SUNDAY, defaults.overtime_multipliers.sunday)?,
                holiday: read_decimal(provider, keys::OVERTIME_HOLIDAY, defaults.overtime_multipliers.holiday)?,
            },
            late_deduction_per_occurrence: read_decimal(
                provider,
                keys::LATE_PER_OCCURRENCE,
                defaults.late_deduction_per_occurrence,
            )?,
            early_leave_deduction_per_occurrence: read_decimal(
                provider,
                keys::EARLY_LEAVE_PER_OCCURRENCE,
                defaults.early_leave_deduction_per_occurrence,
            )?,
            leave_deduction_ratios: LeaveDeductionRatios {
                annual: read_decimal(provider, keys::LEAVE_RATIO_ANNUAL, defaults.leave_deduction_ratios.annual)?,
                sick: read_decimal(provider, keys::LEAVE_RATIO_SICK, defaults.leave_deduction_ratios.sick)?,
                personal: read_decimal(provider, keys::LEAVE_RATIO_PERSONAL, defaults.leave_deduction_ratios.personal)?,
                other: read_decimal(provider, keys::LEAVE_RATIO_OTHER, defaults.leave_deduction_ratios.other)?,
            },
            full_attendance_bonus: read_decimal(
                provider,
                keys::FULL_ATTENDANCE_BONUS,
                defaults.full_attendance_bonus,
            )?,
            gross_warning_threshold: read_decimal(
                provider,
                keys::GROSS_WARNING_THRESHOLD,
                defaults.gross_warning_threshold,
            )?,
            min_attendance_rate: read_decimal(
                provider,
                keys::MIN_ATTENDANCE_RATE,
                defaults.min_attendance_rate,
            )?,
            rounding_mode,
        })
    }

    /// Rounds a money amount with the configured mode.
    pub fn round_money(&self, value: Decimal) -> Decimal {
        self.rounding_mode.round_money(value)
    }
}

fn read_decimal<P: ConfigProvider + ?Sized>(
    provider: &P,
    key: &str,
    default: Decimal,
) -> EngineResult<Decimal> {
    match provider.rule_value(key) {
        None => Ok(default),
        Some(value) => value
            .as_decimal()
            .ok_or_else(|| wrong_type(key, "numeric", &value)),
    }
}

fn read_time<P: ConfigProvider + ?Sized>(
    provider: &P,
    key: &str,
    default: NaiveTime,
) -> EngineResult<NaiveTime> {
    match provider.rule_value(key) {
        None => Ok(default),
        Some(value) => {
            let text = value.as_text().ok_or_else(|| wrong_type(key, "text", &value))?;
            NaiveTime::parse_from_str(text.trim(), "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(text.trim(), "%H:%M:%S"))
                .map_err(|_| invalid(key, &format!("expected HH:MM time, got '{}'", text)))
        }
    }
}

fn wrong_type(key: &str, expected: &str, found: &RuleValue) -> EngineError {
    invalid(
        key,
        &format!("expected {} value, got {}", expected, found.data_type()),
    )
}

fn invalid(key: &str, message: &str) -> EngineError {
    EngineError::InvalidConfigValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn provider(entries: Vec<(&str, RuleValue)>) -> HashMap<String, RuleValue> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_empty_provider_yields_defaults() {
        let settings = PayrollSettings::from_provider(&provider(vec![])).unwrap();
        assert_eq!(settings, PayrollSettings::default());
        assert_eq!(settings.standard_check_in, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(settings.monthly_standard_hours, dec("174"));
    }

    #[test]
    fn test_reads_times_and_rounding_mode() {
        let settings = PayrollSettings::from_provider(&provider(vec![
            (keys::STANDARD_CHECK_IN, RuleValue::Text("08:30".to_string())),
            (keys::STANDARD_CHECK_OUT, RuleValue::Text("17:30:00".to_string())),
            (keys::ROUNDING_MODE, RuleValue::Text("bankers".to_string())),
            (keys::LUNCH_BREAK_MINUTES, RuleValue::Numeric(dec("45"))),
        ]))
        .unwrap();

        assert_eq!(settings.standard_check_in, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(settings.standard_check_out, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(settings.rounding_mode, RoundingMode::Bankers);
        assert_eq!(settings.lunch_break_minutes, 45);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = PayrollSettings::from_provider(&provider(vec![(
            keys::OVERTIME_REGULAR,
            RuleValue::Text("1.5".to_string()),
        )]));

        match result {
            Err(EngineError::InvalidConfigValue { key, message }) => {
                assert_eq!(key, keys::OVERTIME_REGULAR);
                assert_eq!(message, "expected numeric value, got text");
            }
            _ => panic!("Expected InvalidConfigValue error"),
        }
    }

    #[test]
    fn test_unparsable_time_is_rejected() {
        let result = PayrollSettings::from_provider(&provider(vec![(
            keys::STANDARD_CHECK_IN,
            RuleValue::Text("nine".to_string()),
        )]));
        assert!(matches!(result, Err(EngineError::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_fractional_lunch_break_is_rejected() {
        let result = PayrollSettings::from_provider(&provider(vec![(
            keys::LUNCH_BREAK_MINUTES,
            RuleValue::Numeric(dec("30.5")),
        )]));
        assert!(matches!(result, Err(EngineError::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_zero_monthly_hours_is_rejected() {
        let result = PayrollSettings::from_provider(&provider(vec![(
            keys::MONTHLY_STANDARD_HOURS,
            RuleValue::Numeric(Decimal::ZERO),
        )]));
        assert!(matches!(result, Err(EngineError::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_rounding_modes_differ_on_midpoint() {
        assert_eq!(RoundingMode::HalfUp.round_money(dec("0.125")), dec("0.13"));
        assert_eq!(RoundingMode::Bankers.round_money(dec("0.125")), dec("0.12"));
        assert_eq!(RoundingMode::HalfUp.round_money(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn test_multiplier_and_ratio_lookup() {
        let settings = PayrollSettings::default();
        assert_eq!(settings.overtime_multipliers.for_kind(DayKind::Holiday), dec("3"));
        assert_eq!(settings.overtime_multipliers.for_kind(DayKind::Workday), dec("1.5"));
        assert_eq!(settings.leave_deduction_ratios.for_type(LeaveType::Sick), dec("0.4"));
        assert_eq!(settings.leave_deduction_ratios.for_type(LeaveType::Annual), Decimal::ZERO);
    }
}
