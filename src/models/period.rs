//! Payroll period model.
//!
//! A payroll period is a calendar month identified by `(year, month)`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month that payroll is composed for.
///
/// Periods order chronologically (year first, then month).
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
///
/// let period = PayrollPeriod::new(2024, 3).unwrap();
/// assert_eq!(period.to_string(), "2024-03");
/// assert_eq!(period.last_day().to_string(), "2024-03-31");
/// ```
///
/// Deserialization goes through [`PayrollPeriod::new`], so a snapshot with an
/// out-of-range month is rejected rather than composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct PayrollPeriod {
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
}

impl PayrollPeriod {
    /// Creates a period, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The first calendar day of the period.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The last calendar day of the period.
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Signed number of months from `self` to `later` (0 when equal).
    ///
    /// ```
    /// use payroll_engine::models::PayrollPeriod;
    ///
    /// let start = PayrollPeriod::new(2023, 11).unwrap();
    /// let end = PayrollPeriod::new(2024, 2).unwrap();
    /// assert_eq!(start.months_until(end), 3);
    /// assert_eq!(end.months_until(start), -3);
    /// ```
    pub fn months_until(&self, later: PayrollPeriod) -> i64 {
        (i64::from(later.year) - i64::from(self.year)) * 12 + i64::from(later.month)
            - i64::from(self.month)
    }

    /// Returns true if the date falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Unchecked wire form of a period.
#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for PayrollPeriod {
    type Error = EngineError;

    fn try_from(raw: RawPeriod) -> EngineResult<Self> {
        Self::new(raw.year, raw.month)
    }
}

impl std::fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
