//! Performance pay calculation.
//!
//! Scores map to grades, and grades to pay coefficients, through fixed
//! ladders. Pay is always computed from the coefficient stored on the
//! record: a manual override is legal and only reported as a warning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollSettings;
use crate::models::{Issue, IssueCode, PerformanceGrade, PerformanceRecord};

/// Tolerance when comparing a stored coefficient with the ladder value.
pub const COEFFICIENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Coefficient for a grade label the ladder does not know.
pub const DEFAULT_COEFFICIENT: Decimal = Decimal::ONE;

/// Score thresholds, checked from the top; the first one reached wins.
const SCORE_LADDER: [(i64, PerformanceGrade); 10] = [
    (95, PerformanceGrade::S),
    (90, PerformanceGrade::APlus),
    (85, PerformanceGrade::A),
    (80, PerformanceGrade::AMinus),
    (75, PerformanceGrade::BPlus),
    (70, PerformanceGrade::B),
    (65, PerformanceGrade::BMinus),
    (60, PerformanceGrade::CPlus),
    (55, PerformanceGrade::C),
    (50, PerformanceGrade::CMinus),
];

/// The result of a performance pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformancePayResult {
    /// Performance pay, rounded to cents.
    pub amount: Decimal,
    /// Grade implied by the score, when a record exists.
    pub derived_grade: Option<PerformanceGrade>,
    /// Coefficient implied by the score, when a record exists.
    pub derived_coefficient: Option<Decimal>,
    /// Consistency findings for the record.
    pub issues: Vec<Issue>,
}

/// Maps a score to a grade.
///
/// ```
/// use payroll_engine::calculation::grade_for_score;
/// use payroll_engine::models::PerformanceGrade;
/// use rust_decimal::Decimal;
///
/// assert_eq!(grade_for_score(Decimal::new(95, 0)), PerformanceGrade::S);
/// assert_eq!(grade_for_score(Decimal::new(899, 1)), PerformanceGrade::A);
/// assert_eq!(grade_for_score(Decimal::new(10, 0)), PerformanceGrade::D);
/// ```
pub fn grade_for_score(score: Decimal) -> PerformanceGrade {
    SCORE_LADDER
        .iter()
        .find(|(threshold, _)| score >= Decimal::from(*threshold))
        .map(|(_, grade)| *grade)
        .unwrap_or(PerformanceGrade::D)
}

/// Maps a grade to its pay coefficient.
pub fn coefficient_for_grade(grade: PerformanceGrade) -> Decimal {
    match grade {
        PerformanceGrade::S => Decimal::new(15, 1),
        PerformanceGrade::APlus => Decimal::new(13, 1),
        PerformanceGrade::A => Decimal::new(12, 1),
        PerformanceGrade::AMinus => Decimal::new(11, 1),
        PerformanceGrade::BPlus => Decimal::new(10, 1),
        PerformanceGrade::B => Decimal::new(9, 1),
        PerformanceGrade::BMinus => Decimal::new(8, 1),
        PerformanceGrade::CPlus => Decimal::new(7, 1),
        PerformanceGrade::C => Decimal::new(6, 1),
        PerformanceGrade::CMinus => Decimal::new(5, 1),
        PerformanceGrade::D => Decimal::new(3, 1),
    }
}

/// Maps a stored grade label to its coefficient, [`DEFAULT_COEFFICIENT`]
/// when the label is unknown.
pub fn coefficient_for_label(label: &str) -> Decimal {
    PerformanceGrade::parse(label)
        .map(coefficient_for_grade)
        .unwrap_or(DEFAULT_COEFFICIENT)
}

/// Checks a record's stored grade and coefficient against its score.
///
/// Grade and coefficient mismatches are warnings. A score outside 0-100
/// or a blank grade is an error.
pub fn check_performance_record(record: &PerformanceRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    if record.score < Decimal::ZERO || record.score > Decimal::ONE_HUNDRED {
        issues.push(Issue::error(
            IssueCode::ScoreOutOfRange,
            Some("performance.score"),
            format!("Score {} is outside 0-100", record.score),
        ));
    }

    let derived_grade = grade_for_score(record.score);
    if record.grade.trim().is_empty() {
        issues.push(Issue::error(
            IssueCode::MissingField,
            Some("performance.grade"),
            "Performance grade is required",
        ));
    } else if PerformanceGrade::parse(&record.grade) != Some(derived_grade) {
        issues.push(Issue::warning(
            IssueCode::GradeMismatch,
            Some("performance.grade"),
            format!(
                "Stored grade '{}' differs from grade {} for score {}",
                record.grade, derived_grade, record.score
            ),
        ));
    }

    let derived_coefficient = coefficient_for_grade(derived_grade);
    if (record.coefficient - derived_coefficient).abs() > COEFFICIENT_TOLERANCE {
        issues.push(Issue::warning(
            IssueCode::CoefficientMismatch,
            Some("performance.coefficient"),
            format!(
                "Stored coefficient {} differs from {} for grade {}",
                record.coefficient, derived_coefficient, derived_grade
            ),
        ));
    }

    issues
}

/// Calculates performance pay as `performance_base * stored coefficient`.
///
/// A missing record yields zero pay and a `MissingPerformanceRecord`
/// warning.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_performance_pay;
/// use payroll_engine::config::PayrollSettings;
/// use payroll_engine::models::{PayrollPeriod, PerformanceRecord};
/// use rust_decimal::Decimal;
///
/// let record = PerformanceRecord {
///     employee_id: "emp_001".to_string(),
///     period: PayrollPeriod::new(2024, 3).unwrap(),
///     score: Decimal::new(92, 0),
///     grade: "A+".to_string(),
///     coefficient: Decimal::new(13, 1),
///     performance_base: Decimal::new(2000, 0),
/// };
///
/// let result = calculate_performance_pay(Some(&record), &PayrollSettings::default());
/// assert_eq!(result.amount, Decimal::new(2600, 0));
/// assert!(result.issues.is_empty());
/// ```
pub fn calculate_performance_pay(
    record: Option<&PerformanceRecord>,
    settings: &PayrollSettings,
) -> PerformancePayResult {
    let Some(record) = record else {
        return PerformancePayResult {
            amount: Decimal::ZERO,
            derived_grade: None,
            derived_coefficient: None,
            issues: vec![Issue::warning(
                IssueCode::MissingPerformanceRecord,
                Some("performance"),
                "No performance record for the period; performance pay is zero",
            )],
        };
    };

    let derived_grade = grade_for_score(record.score);

    PerformancePayResult {
        amount: settings.round_money(record.performance_base * record.coefficient),
        derived_grade: Some(derived_grade),
        derived_coefficient: Some(coefficient_for_grade(derived_grade)),
        issues: check_performance_record(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayrollPeriod, Severity};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(score: &str, grade: &str, coefficient: &str) -> PerformanceRecord {
        PerformanceRecord {
            employee_id: "emp_001".to_string(),
            period: PayrollPeriod::new(2024, 3).unwrap(),
            score: dec(score),
            grade: grade.to_string(),
            coefficient: dec(coefficient),
            performance_base: dec("1500"),
        }
    }

    #[test]
    fn test_score_ladder_thresholds() {
        let cases = [
            ("100", PerformanceGrade::S),
            ("95", PerformanceGrade::S),
            ("94.99", PerformanceGrade::APlus),
            ("90", PerformanceGrade::APlus),
            ("85", PerformanceGrade::A),
            ("80", PerformanceGrade::AMinus),
            ("75", PerformanceGrade::BPlus),
            ("70", PerformanceGrade::B),
            ("65", PerformanceGrade::BMinus),
            ("60", PerformanceGrade::CPlus),
            ("55", PerformanceGrade::C),
            ("50", PerformanceGrade::CMinus),
            ("49.9", PerformanceGrade::D),
            ("0", PerformanceGrade::D),
        ];
        for (score, grade) in cases {
            assert_eq!(grade_for_score(dec(score)), grade, "score {}", score);
        }
    }

    #[test]
    fn test_coefficient_ladder() {
        assert_eq!(coefficient_for_grade(PerformanceGrade::S), dec("1.5"));
        assert_eq!(coefficient_for_grade(PerformanceGrade::BPlus), dec("1.0"));
        assert_eq!(coefficient_for_grade(PerformanceGrade::D), dec("0.3"));
        assert_eq!(coefficient_for_label("a-"), dec("1.1"));
        assert_eq!(coefficient_for_label("Z"), dec("1.0"));
    }

    // PERF-001: consistent record
    #[test]
    fn test_consistent_record_pays_base_times_coefficient() {
        let result = calculate_performance_pay(Some(&record("86", "A", "1.2")), &PayrollSettings::default());
        assert_eq!(result.amount, dec("1800"));
        assert_eq!(result.derived_grade, Some(PerformanceGrade::A));
        assert!(result.issues.is_empty());
    }

    // PERF-002: manual override is paid as stored and flagged
    #[test]
    fn test_override_uses_stored_coefficient_and_warns() {
        let result = calculate_performance_pay(Some(&record("72", "A", "1.25")), &PayrollSettings::default());

        assert_eq!(result.amount, dec("1875"));
        let codes: Vec<IssueCode> = result.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::GradeMismatch, IssueCode::CoefficientMismatch]);
        assert!(result.issues.iter().all(|i| i.severity == Severity::Warning));
    }

    // PERF-003: coefficient within tolerance is accepted
    #[test]
    fn test_coefficient_within_tolerance() {
        let issues = check_performance_record(&record("86", "A", "1.2005"));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_blank_grade_is_missing_field() {
        let issues = check_performance_record(&record("86", "", "1.2"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::MissingField);
        assert_eq!(issues[0].field.as_deref(), Some("performance.grade"));
        assert!(issues[0].is_error());
    }

    // PERF-004: score out of range
    #[test]
    fn test_score_out_of_range_is_error() {
        let issues = check_performance_record(&record("120", "S", "1.5"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::ScoreOutOfRange);
        assert!(issues[0].is_error());
    }

    // PERF-005: no record
    #[test]
    fn test_missing_record_pays_zero() {
        let result = calculate_performance_pay(None, &PayrollSettings::default());
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.issues[0].code, IssueCode::MissingPerformanceRecord);
    }

    #[test]
    fn test_pay_is_rounded_to_cents() {
        let mut r = record("86", "A", "1.2");
        r.performance_base = dec("1234.567");
        let result = calculate_performance_pay(Some(&r), &PayrollSettings::default());
        // 1481.4804
        assert_eq!(result.amount, dec("1481.48"));
    }
}
