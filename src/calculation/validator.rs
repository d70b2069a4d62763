//! Payroll validation.
//!
//! The [`PayrollValidator`] runs an ordered battery of checks over a
//! composed [`PayrollResult`] and its inputs. Each finding is an [`Issue`]:
//! errors block the `Draft -> Calculated` transition, warnings are attached
//! to the result for review.
//!
//! # Checks
//!
//! | Order | Check | Severity |
//! |-------|-------|----------|
//! | 1 | Required fields present | Error |
//! | 2 | Period not after the calculation date | Error |
//! | 3 | Attended days do not exceed scheduled days | Error |
//! | 4 | Gross, net and cost reconcile within 0.01 | Error |
//! | 5 | Pay components and deductions not negative | Error |
//! | 6 | Gross below the sanity threshold | Warning |
//! | 7 | Net salary not negative | Warning |
//! | 8 | Attendance rate at or above the minimum | Warning |
//! | 9 | Performance record consistent with its score | Warning (score range: Error) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollSettings;
use crate::models::{Issue, IssueCode, PayrollResult};

use super::composer::PayrollInputs;
use super::performance::check_performance_record;
use super::rounding::within_tolerance;

/// The outcome of validating one payroll result.
///
/// Both lists are deduplicated and kept in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Blocking findings.
    pub errors: Vec<Issue>,
    /// Advisory findings.
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// Adds a finding to the list matching its severity, unless present.
    pub fn push(&mut self, issue: Issue) {
        let list = if issue.is_error() {
            &mut self.errors
        } else {
            &mut self.warnings
        };
        if !list.contains(&issue) {
            list.push(issue);
        }
    }

    /// True when at least one error was found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `Ok(warnings)` when nothing blocks, otherwise `Err(errors)`.
    pub fn into_result(self) -> Result<Vec<Issue>, Vec<Issue>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

/// Validates composed payroll results.
#[derive(Debug, Clone, Default)]
pub struct PayrollValidator {
    settings: PayrollSettings,
}

impl PayrollValidator {
    /// Creates a validator with the given thresholds.
    pub fn new(settings: PayrollSettings) -> Self {
        Self { settings }
    }

    /// Runs every check against `result` and the inputs it was composed
    /// from.
    ///
    /// Warnings already attached to the result's audit trace are carried
    /// into the report.
    pub fn validate(&self, result: &PayrollResult, inputs: &PayrollInputs) -> ValidationReport {
        let mut report = ValidationReport::default();

        check_required_fields(result, &mut report);
        check_period(result, inputs, &mut report);
        check_attendance_days(result, &mut report);
        check_totals(result, &mut report);
        check_non_negative(result, &mut report);
        self.check_thresholds(result, &mut report);

        if let Some(record) = inputs
            .performance
            .as_ref()
            .filter(|r| r.employee_id == result.employee_id && r.period == result.period)
        {
            for issue in check_performance_record(record) {
                report.push(issue);
            }
        }

        for warning in &result.audit_trace.warnings {
            report.push(warning.clone());
        }

        tracing::debug!(
            employee_id = %result.employee_id,
            period = %result.period,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated payroll"
        );

        report
    }

    fn check_thresholds(&self, result: &PayrollResult, report: &mut ValidationReport) {
        if result.gross_salary > self.settings.gross_warning_threshold {
            report.push(Issue::warning(
                IssueCode::GrossAboveThreshold,
                Some("gross_salary"),
                format!(
                    "Gross salary {} exceeds {}",
                    result.gross_salary, self.settings.gross_warning_threshold
                ),
            ));
        }

        if result.net_salary < Decimal::ZERO {
            report.push(Issue::warning(
                IssueCode::NegativeNetSalary,
                Some("net_salary"),
                format!("Net salary {} is negative", result.net_salary),
            ));
        }

        if let Some(rate) = result.attendance.attendance_rate() {
            if rate < self.settings.min_attendance_rate {
                report.push(Issue::warning(
                    IssueCode::LowAttendanceRate,
                    Some("attendance"),
                    format!(
                        "Attendance rate {} is below {}",
                        rate.round_dp(4),
                        self.settings.min_attendance_rate
                    ),
                ));
            }
        }
    }
}

fn check_required_fields(result: &PayrollResult, report: &mut ValidationReport) {
    if result.employee_id.trim().is_empty() {
        report.push(Issue::error(
            IssueCode::MissingField,
            Some("employee_id"),
            "Employee id is required",
        ));
    }
    if result.basic_salary_total.is_zero() {
        report.push(Issue::error(
            IssueCode::MissingField,
            Some("basic_salary_total"),
            "Basic salary total is zero; no salary base amounts were provided",
        ));
    }
}

fn check_period(result: &PayrollResult, inputs: &PayrollInputs, report: &mut ValidationReport) {
    if result.period.first_day() > inputs.as_of {
        report.push(Issue::error(
            IssueCode::PeriodInFuture,
            Some("period"),
            format!(
                "Period {} starts after calculation date {}",
                result.period, inputs.as_of
            ),
        ));
    }
}

fn check_attendance_days(result: &PayrollResult, report: &mut ValidationReport) {
    let attendance = &result.attendance;
    if attendance.actual_work_days > attendance.expected_work_days {
        report.push(Issue::error(
            IssueCode::AttendanceExceedsExpected,
            Some("attendance.actual_work_days"),
            format!(
                "{} attended days exceed {} scheduled days",
                attendance.actual_work_days, attendance.expected_work_days
            ),
        ));
    }
}

fn check_totals(result: &PayrollResult, report: &mut ValidationReport) {
    let totals = [
        ("gross_salary", result.gross_salary, result.expected_gross()),
        ("net_salary", result.net_salary, result.expected_net()),
        ("total_company_cost", result.total_company_cost, result.expected_cost()),
    ];

    for (field, stored, recomputed) in totals {
        if !within_tolerance(stored, recomputed) {
            report.push(Issue::error(
                IssueCode::TotalsMismatch,
                Some(field),
                format!("Stored {} does not match recomputed {}", stored, recomputed),
            ));
        }
    }
}

fn check_non_negative(result: &PayrollResult, report: &mut ValidationReport) {
    let components = [
        ("base_salary", result.base_salary),
        ("position_salary", result.position_salary),
        ("skill_salary", result.skill_salary),
        ("seniority_salary", result.seniority_salary),
        ("performance_salary", result.performance_salary),
        ("allowance_total", result.allowance_total),
        ("overtime_pay_total", result.overtime_pay_total),
        ("non_compete_compensation", result.non_compete_compensation),
        ("bonus_total", result.bonus_total),
        ("late_deduction", result.late_deduction),
        ("early_leave_deduction", result.early_leave_deduction),
        ("absence_deduction", result.absence_deduction),
        ("leave_deduction", result.leave_deduction),
        ("other_deduction", result.other_deduction),
        ("income_tax", result.income_tax),
        ("personal_contribution_total", result.personal_contribution_total),
        ("company_contribution_total", result.company_contribution_total),
    ];

    for (field, value) in components {
        if value < Decimal::ZERO {
            report.push(Issue::error(
                IssueCode::NegativeComponent,
                Some(field),
                format!("{} is negative ({})", field, value),
            ));
        }
    }
}
