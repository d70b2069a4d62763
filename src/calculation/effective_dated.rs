//! Effective-dated version resolution.
//!
//! Salary bases and social-security configurations are kept as versions,
//! each valid over `[effective_from, effective_to]`. This module selects the
//! version covering a date and provides the writer-side helpers that keep
//! one employee's windows from overlapping.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of versioned input, used in `MissingInput` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCategory {
    /// A [`SalaryBaseVersion`](crate::models::SalaryBaseVersion).
    SalaryBase,
    /// A [`SocialSecurityVersion`](crate::models::SocialSecurityVersion).
    SocialSecurity,
}

impl std::fmt::Display for InputCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputCategory::SalaryBase => write!(f, "salary base"),
            InputCategory::SocialSecurity => write!(f, "social security"),
        }
    }
}

/// A record valid over an inclusive date window.
pub trait EffectiveDated {
    /// The input category reported when no version is found.
    const CATEGORY: InputCategory;

    /// The employee the record belongs to.
    fn employee_id(&self) -> &str;

    /// First day the record applies.
    fn effective_from(&self) -> NaiveDate;

    /// Last day the record applies, or `None` while open-ended.
    fn effective_to(&self) -> Option<NaiveDate>;

    /// True when `date` falls inside the window, both ends inclusive.
    fn covers(&self, date: NaiveDate) -> bool {
        self.effective_from() <= date && self.effective_to().is_none_or(|to| to >= date)
    }
}

/// An effective-dated record that can be re-windowed into a new version.
pub trait Versioned: EffectiveDated + Clone {
    /// A copy of this record with a different window and active flag.
    fn with_window(&self, from: NaiveDate, to: Option<NaiveDate>, is_active: bool) -> Self;
}

/// Selects the version whose window contains `target_date`.
///
/// If more than one version matches, the one with the latest
/// `effective_from` wins. Inactive (superseded) versions remain eligible
/// so that historical periods can still be recomputed.
///
/// # Errors
///
/// Returns `MissingInput` naming the employee, the category and the date
/// when no version covers it.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::resolve;
/// use payroll_engine::models::{Allowances, SalaryBaseVersion};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let version = SalaryBaseVersion {
///     employee_id: "emp_001".to_string(),
///     base_salary: Decimal::new(5000, 0),
///     position_salary: Decimal::ZERO,
///     skill_salary: Decimal::ZERO,
///     seniority_salary: Decimal::ZERO,
///     allowances: Allowances::default(),
///     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_to: None,
///     is_active: true,
/// };
///
/// let versions = vec![version];
/// let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
/// let found = resolve(&versions, date, "emp_001").unwrap();
/// assert_eq!(found.base_salary, Decimal::new(5000, 0));
/// ```
pub fn resolve<'a, T: EffectiveDated>(
    versions: &'a [T],
    target_date: NaiveDate,
    employee_id: &str,
) -> EngineResult<&'a T> {
    versions
        .iter()
        .filter(|v| v.employee_id() == employee_id && v.covers(target_date))
        .max_by_key(|v| v.effective_from())
        .ok_or_else(|| EngineError::MissingInput {
            employee_id: employee_id.to_string(),
            category: T::CATEGORY,
            date: target_date,
        })
}

/// Closes `old` the day before `new_effective_date` and opens a successor.
///
/// Returns `(closed, opened)`: the closed copy ends on
/// `new_effective_date - 1` and is inactive; the opened copy starts on
/// `new_effective_date`, is open-ended and active. Neither input is mutated.
///
/// # Errors
///
/// Returns `InvalidVersionWindow` if the new date does not fall strictly
/// after `old.effective_from`, or if `old` already ends before the day the
/// successor would need it closed.
pub fn close_and_open<T: Versioned>(old: &T, new_effective_date: NaiveDate) -> EngineResult<(T, T)> {
    if new_effective_date <= old.effective_from() {
        return Err(EngineError::InvalidVersionWindow {
            employee_id: old.employee_id().to_string(),
            message: format!(
                "new version on {} does not start after current version ({})",
                new_effective_date,
                old.effective_from()
            ),
        });
    }

    let close_on = new_effective_date
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| EngineError::InvalidVersionWindow {
            employee_id: old.employee_id().to_string(),
            message: format!("cannot close a version before {}", new_effective_date),
        })?;

    if let Some(to) = old.effective_to() {
        if to < close_on {
            return Err(EngineError::InvalidVersionWindow {
                employee_id: old.employee_id().to_string(),
                message: format!(
                    "current version already ended on {}, leaving a gap before {}",
                    to, new_effective_date
                ),
            });
        }
    }

    let closed = old.with_window(old.effective_from(), Some(close_on), false);
    let opened = old.with_window(new_effective_date, None, true);
    Ok((closed, opened))
}

/// Verifies that no two versions of the same employee overlap.
///
/// Versions may be given in any order and for several employees.
///
/// # Errors
///
/// Returns `InvalidVersionWindow` for a window ending before it starts, or
/// for the first pair of overlapping windows found.
pub fn check_non_overlapping<T: EffectiveDated>(versions: &[T]) -> EngineResult<()> {
    let mut sorted: Vec<&T> = versions.iter().collect();
    sorted.sort_by(|a, b| {
        a.employee_id()
            .cmp(b.employee_id())
            .then(a.effective_from().cmp(&b.effective_from()))
    });

    for version in &sorted {
        if let Some(to) = version.effective_to() {
            if to < version.effective_from() {
                return Err(EngineError::InvalidVersionWindow {
                    employee_id: version.employee_id().to_string(),
                    message: format!(
                        "version ends on {} before it starts on {}",
                        to,
                        version.effective_from()
                    ),
                });
            }
        }
    }

    for pair in sorted.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        if earlier.employee_id() != later.employee_id() {
            continue;
        }
        // Sorted by start, so the pair overlaps iff the earlier one is still open.
        if earlier.covers(later.effective_from()) {
            return Err(EngineError::InvalidVersionWindow {
                employee_id: earlier.employee_id().to_string(),
                message: format!(
                    "version starting {} overlaps version starting {}",
                    earlier.effective_from(),
                    later.effective_from()
                ),
            });
        }
    }

    Ok(())
}
