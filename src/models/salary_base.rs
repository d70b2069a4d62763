//! Salary base model.
//!
//! A [`SalaryBaseVersion`] holds the fixed monthly pay components of one
//! employee over an effective window. Versions are never edited in place:
//! a pay change closes the current window and opens a new version.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{EffectiveDated, InputCategory, Versioned};

/// Fixed monthly allowances paid alongside the basic salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// Meal allowance.
    #[serde(default)]
    pub meal: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Communication allowance.
    #[serde(default)]
    pub communication: Decimal,
    /// Housing allowance.
    #[serde(default)]
    pub housing: Decimal,
    /// Any other fixed allowance.
    #[serde(default)]
    pub other: Decimal,
}

impl Allowances {
    /// Sum of all allowance fields, or `None` if it overflows.
    pub fn total(&self) -> Option<Decimal> {
        [self.meal, self.transport, self.communication, self.housing, self.other]
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}

/// One effective-dated version of an employee's fixed pay.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Allowances, SalaryBaseVersion};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let version = SalaryBaseVersion {
///     employee_id: "emp_001".to_string(),
///     base_salary: Decimal::new(5000, 0),
///     position_salary: Decimal::new(1500, 0),
///     skill_salary: Decimal::new(800, 0),
///     seniority_salary: Decimal::new(200, 0),
///     allowances: Allowances::default(),
///     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_to: None,
///     is_active: true,
/// };
/// assert_eq!(version.basic_salary_total(), Some(Decimal::new(7500, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBaseVersion {
    /// The employee this version belongs to.
    pub employee_id: String,
    /// Base salary.
    pub base_salary: Decimal,
    /// Position salary.
    #[serde(default)]
    pub position_salary: Decimal,
    /// Skill salary.
    #[serde(default)]
    pub skill_salary: Decimal,
    /// Seniority salary.
    #[serde(default)]
    pub seniority_salary: Decimal,
    /// Fixed allowances.
    #[serde(default)]
    pub allowances: Allowances,
    /// First day this version applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day this version applies (inclusive); `None` while open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Whether this is the employee's current version.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SalaryBaseVersion {
    /// `base + position + skill + seniority`, or `None` if it overflows.
    pub fn basic_salary_total(&self) -> Option<Decimal> {
        [self.base_salary, self.position_salary, self.skill_salary, self.seniority_salary]
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Sum of all allowance fields, or `None` if it overflows.
    pub fn allowance_total(&self) -> Option<Decimal> {
        self.allowances.total()
    }
}

impl EffectiveDated for SalaryBaseVersion {
    const CATEGORY: InputCategory = InputCategory::SalaryBase;

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl Versioned for SalaryBaseVersion {
    fn with_window(&self, from: NaiveDate, to: Option<NaiveDate>, is_active: bool) -> Self {
        Self {
            effective_from: from,
            effective_to: to,
            is_active,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "employee_id": "emp_001",
            "base_salary": "6000.00",
            "effective_from": "2024-01-01"
        }"#;

        let version: SalaryBaseVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.base_salary, dec("6000.00"));
        assert_eq!(version.position_salary, Decimal::ZERO);
        assert_eq!(version.effective_to, None);
        assert!(version.is_active);
        assert_eq!(version.allowance_total(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_allowance_total_sums_every_field() {
        let allowances = Allowances {
            meal: dec("300"),
            transport: dec("200"),
            communication: dec("100"),
            housing: dec("800"),
            other: dec("50.50"),
        };
        assert_eq!(allowances.total(), Some(dec("1450.50")));
    }

    #[test]
    fn test_totals_report_overflow() {
        let allowances = Allowances {
            housing: Decimal::MAX,
            other: Decimal::ONE,
            ..Allowances::default()
        };
        assert_eq!(allowances.total(), None);

        let version = SalaryBaseVersion {
            employee_id: "emp_001".to_string(),
            base_salary: Decimal::MAX,
            position_salary: Decimal::MAX,
            skill_salary: Decimal::ZERO,
            seniority_salary: Decimal::ZERO,
            allowances: Allowances::default(),
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            effective_to: None,
            is_active: true,
        };
        assert_eq!(version.basic_salary_total(), None);
    }

    #[test]
    fn test_with_window_keeps_pay_components() {
        let version = SalaryBaseVersion {
            employee_id: "emp_001".to_string(),
            base_salary: dec("5000"),
            position_salary: dec("1000"),
            skill_salary: Decimal::ZERO,
            seniority_salary: Decimal::ZERO,
            allowances: Allowances::default(),
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            effective_to: None,
            is_active: true,
        };

        let closed = version.with_window(
            version.effective_from,
            NaiveDate::from_ymd_opt(2024, 5, 31),
            false,
        );
        assert_eq!(closed.basic_salary_total(), Some(dec("6000")));
        assert_eq!(closed.effective_to, NaiveDate::from_ymd_opt(2024, 5, 31));
        assert!(!closed.is_active);
    }
}
