//! Structured validation findings.
//!
//! Every check in the engine reports an [`Issue`] with a severity and a
//! machine-readable [`IssueCode`], so callers branch on codes rather than
//! on message text.

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the `Draft -> Calculated` transition.
    Error,
    /// Advisory; attached to the result for review.
    Warning,
}

/// Machine-readable finding codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A required field is empty or absent.
    MissingField,
    /// The payroll period starts after the calculation date.
    PeriodInFuture,
    /// More attended days than scheduled days.
    AttendanceExceedsExpected,
    /// Stored totals do not reconcile with their components.
    TotalsMismatch,
    /// A pay component that must not be negative is negative.
    NegativeComponent,
    /// Gross salary above the sanity threshold.
    GrossAboveThreshold,
    /// Net salary below zero.
    NegativeNetSalary,
    /// Attendance rate below the configured minimum.
    LowAttendanceRate,
    /// Stored grade differs from the score-derived grade.
    GradeMismatch,
    /// Stored coefficient differs from the grade-derived coefficient.
    CoefficientMismatch,
    /// Appraisal score outside 0-100.
    ScoreOutOfRange,
    /// No appraisal found for the period.
    MissingPerformanceRecord,
    /// The social-security version is disabled; no contributions taken.
    SocialSecurityDisabled,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Whether the finding blocks progression.
    pub severity: Severity,
    /// What was found.
    pub code: IssueCode,
    /// The field concerned, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// A blocking finding.
    pub fn error(code: IssueCode, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    /// An advisory finding.
    pub fn warning(code: IssueCode, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    /// True for blocking findings.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{:?}] {}: {}", self.code, field, self.message),
            None => write!(f, "[{:?}] {}", self.code, self.message),
        }
    }
}
