//! Performance appraisal model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// Appraisal grades, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceGrade {
    /// Score 95 and above.
    #[serde(rename = "S")]
    S,
    /// Score 90 to 94.
    #[serde(rename = "A+")]
    APlus,
    /// Score 85 to 89.
    #[serde(rename = "A")]
    A,
    /// Score 80 to 84.
    #[serde(rename = "A-")]
    AMinus,
    /// Score 75 to 79.
    #[serde(rename = "B+")]
    BPlus,
    /// Score 70 to 74.
    #[serde(rename = "B")]
    B,
    /// Score 65 to 69.
    #[serde(rename = "B-")]
    BMinus,
    /// Score 60 to 64.
    #[serde(rename = "C+")]
    CPlus,
    /// Score 55 to 59.
    #[serde(rename = "C")]
    C,
    /// Score 50 to 54.
    #[serde(rename = "C-")]
    CMinus,
    /// Score below 50.
    #[serde(rename = "D")]
    D,
}

impl PerformanceGrade {
    /// The grade label as stored on records.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceGrade::S => "S",
            PerformanceGrade::APlus => "A+",
            PerformanceGrade::A => "A",
            PerformanceGrade::AMinus => "A-",
            PerformanceGrade::BPlus => "B+",
            PerformanceGrade::B => "B",
            PerformanceGrade::BMinus => "B-",
            PerformanceGrade::CPlus => "C+",
            PerformanceGrade::C => "C",
            PerformanceGrade::CMinus => "C-",
            PerformanceGrade::D => "D",
        }
    }

    /// Parses a stored grade label; `None` for unknown labels.
    ///
    /// ```
    /// use payroll_engine::models::PerformanceGrade;
    ///
    /// assert_eq!(PerformanceGrade::parse(" a+ "), Some(PerformanceGrade::APlus));
    /// assert_eq!(PerformanceGrade::parse("Z"), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "S" => Some(PerformanceGrade::S),
            "A+" => Some(PerformanceGrade::APlus),
            "A" => Some(PerformanceGrade::A),
            "A-" => Some(PerformanceGrade::AMinus),
            "B+" => Some(PerformanceGrade::BPlus),
            "B" => Some(PerformanceGrade::B),
            "B-" => Some(PerformanceGrade::BMinus),
            "C+" => Some(PerformanceGrade::CPlus),
            "C" => Some(PerformanceGrade::C),
            "C-" => Some(PerformanceGrade::CMinus),
            "D" => Some(PerformanceGrade::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee's appraisal for one payroll period.
///
/// `grade` and `coefficient` normally follow from `score`, but may have been
/// overridden by hand. The stored values are what pay is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// The employee appraised.
    pub employee_id: String,
    /// The period the appraisal covers.
    pub period: PayrollPeriod,
    /// Appraisal score, 0 to 100.
    pub score: Decimal,
    /// Stored grade label, e.g. `"A+"`.
    pub grade: String,
    /// Stored pay coefficient.
    pub coefficient: Decimal,
    /// Amount the coefficient is applied to.
    pub performance_base: Decimal,
}
