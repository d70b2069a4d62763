//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and the structures it is
//! assembled from: overtime buckets, the attendance summary, contribution
//! lines, adjustment lines and the audit trace recording every composition
//! step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AdjustmentKind, ContributionKind, DayKind, Issue, LeaveType, PayrollPeriod};

/// One value per overtime bucket.
///
/// Used both for overtime hours and for overtime pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBuckets {
    /// Ordinary workdays.
    pub regular: Decimal,
    /// Saturdays.
    pub saturday: Decimal,
    /// Sundays.
    pub sunday: Decimal,
    /// Holidays.
    pub holiday: Decimal,
}

impl OvertimeBuckets {
    /// The bucket for a day kind.
    pub fn get(&self, kind: DayKind) -> Decimal {
        match kind {
            DayKind::Workday => self.regular,
            DayKind::Saturday => self.saturday,
            DayKind::Sunday => self.sunday,
            DayKind::Holiday => self.holiday,
        }
    }

    /// Adds to the bucket for a day kind.
    pub fn add(&mut self, kind: DayKind, value: Decimal) {
        match kind {
            DayKind::Workday => self.regular += value,
            DayKind::Saturday => self.saturday += value,
            DayKind::Sunday => self.sunday += value,
            DayKind::Holiday => self.holiday += value,
        }
    }

    /// Sum of the four buckets.
    pub fn total(&self) -> Decimal {
        self.regular + self.saturday + self.sunday + self.holiday
    }

    /// Number of buckets holding a non-zero value.
    pub fn non_zero_count(&self) -> usize {
        [self.regular, self.saturday, self.sunday, self.holiday]
            .iter()
            .filter(|v| !v.is_zero())
            .count()
    }
}

/// Approved leave hours by leave type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveHours {
    /// Annual leave.
    pub annual: Decimal,
    /// Sick leave.
    pub sick: Decimal,
    /// Personal leave.
    pub personal: Decimal,
    /// Other leave, including leave rows without a type.
    pub other: Decimal,
}

impl LeaveHours {
    /// Adds hours to the bucket for a leave type.
    pub fn add(&mut self, leave_type: Option<LeaveType>, hours: Decimal) {
        match leave_type {
            Some(LeaveType::Annual) => self.annual += hours,
            Some(LeaveType::Sick) => self.sick += hours,
            Some(LeaveType::Personal) => self.personal += hours,
            Some(LeaveType::Other) | None => self.other += hours,
        }
    }

    /// Total leave hours.
    pub fn total(&self) -> Decimal {
        self.annual + self.sick + self.personal + self.other
    }
}

/// Monthly attendance totals carried on a payroll result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Scheduled working days in the period.
    pub expected_work_days: u32,
    /// Scheduled days actually attended.
    pub actual_work_days: u32,
    /// Scheduled working hours.
    pub expected_work_hours: Decimal,
    /// Hours worked, after lunch-break deduction.
    pub actual_work_hours: Decimal,
    /// Days with a late arrival.
    pub late_count: u32,
    /// Total late minutes.
    pub late_minutes: i64,
    /// Days with an early departure.
    pub early_leave_count: u32,
    /// Total early-leave minutes.
    pub early_leave_minutes: i64,
    /// Scheduled days with no time worked.
    pub absence_days: u32,
    /// Scheduled hours not worked.
    pub absence_hours: Decimal,
    /// Approved leave hours by type.
    pub leave_hours: LeaveHours,
    /// Overtime hours by bucket.
    pub overtime_hours: OvertimeBuckets,
}

impl AttendanceSummary {
    /// `actual_work_days / expected_work_days`, or `None` with nothing scheduled.
    pub fn attendance_rate(&self) -> Option<Decimal> {
        if self.expected_work_days == 0 {
            None
        } else {
            Some(Decimal::from(self.actual_work_days) / Decimal::from(self.expected_work_days))
        }
    }
}

/// Personal and company amounts for one contribution item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    /// The contribution item.
    pub kind: ContributionKind,
    /// The base the rates were applied to.
    pub base: Decimal,
    /// Rounded employee-side amount.
    pub personal_amount: Decimal,
    /// Rounded employer-side amount.
    pub company_amount: Decimal,
}

/// The share of a compensation/penalty record paid in this period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    /// The source record.
    pub record_id: String,
    /// What the record pays for.
    pub kind: AdjustmentKind,
    /// The signed amount due in this period.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a composition decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of composition steps.
    pub steps: Vec<AuditStep>,
    /// Advisory findings attached for review.
    pub warnings: Vec<Issue>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the last one.
    pub fn push_step(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Attaches warnings, skipping ones already present.
    pub fn attach_warnings<I: IntoIterator<Item = Issue>>(&mut self, warnings: I) {
        for warning in warnings {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }
}

/// Workflow state of a payroll result.
///
/// `Draft -> Calculated -> (Approved | Rejected) -> Paid`; `Rejected`
/// returns to `Draft`, `Paid` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Composed, not yet validated.
    Draft,
    /// Validated with no blocking errors.
    Calculated,
    /// Approved for payment.
    Approved,
    /// Sent back for recomputation.
    Rejected,
    /// Paid out.
    Paid,
}

impl std::fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayrollStatus::Draft => write!(f, "draft"),
            PayrollStatus::Calculated => write!(f, "calculated"),
            PayrollStatus::Approved => write!(f, "approved"),
            PayrollStatus::Rejected => write!(f, "rejected"),
            PayrollStatus::Paid => write!(f, "paid"),
        }
    }
}

/// Calculation stage of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationStatus {
    /// Not yet validated.
    Draft,
    /// Validated.
    Calculated,
}

/// Approval stage of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Not decided.
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
}

/// Payment stage of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not paid.
    Unpaid,
    /// Paid.
    Paid,
}

/// The composed payroll of one employee for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Deterministic identifier derived from employee and period.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The period paid.
    pub period: PayrollPeriod,
    /// `effective_from` of the salary base version used.
    pub salary_base_effective_from: NaiveDate,
    /// `effective_from` of the social-security version used.
    pub social_security_effective_from: NaiveDate,

    /// Base salary.
    pub base_salary: Decimal,
    /// Position salary.
    pub position_salary: Decimal,
    /// Skill salary.
    pub skill_salary: Decimal,
    /// Seniority salary.
    pub seniority_salary: Decimal,
    /// `base + position + skill + seniority`.
    pub basic_salary_total: Decimal,
    /// Performance pay.
    pub performance_salary: Decimal,
    /// Sum of fixed allowances.
    pub allowance_total: Decimal,
    /// Hourly rate used for overtime and hour-based deductions.
    pub hourly_rate: Decimal,
    /// Overtime pay by bucket.
    pub overtime_pay: OvertimeBuckets,
    /// Sum of the overtime pay buckets.
    pub overtime_pay_total: Decimal,
    /// Non-compete compensation due this period.
    pub non_compete_compensation: Decimal,
    /// Full-attendance bonus.
    pub attendance_bonus: Decimal,
    /// Other positive adjustments due this period.
    pub other_bonus: Decimal,
    /// `attendance_bonus + other_bonus`.
    pub bonus_total: Decimal,

    /// Late-arrival deduction.
    pub late_deduction: Decimal,
    /// Early-leave deduction.
    pub early_leave_deduction: Decimal,
    /// Absence deduction.
    pub absence_deduction: Decimal,
    /// Leave deduction across leave types.
    pub leave_deduction: Decimal,
    /// Penalties due this period, as a positive amount.
    pub other_deduction: Decimal,
    /// Sum of all deductions.
    pub deduction_total: Decimal,

    /// Per-item social-security amounts.
    pub contributions: Vec<ContributionLine>,
    /// Sum of rounded employee-side contributions.
    pub personal_contribution_total: Decimal,
    /// Sum of rounded employer-side contributions.
    pub company_contribution_total: Decimal,
    /// Pre-computed income tax.
    pub income_tax: Decimal,

    /// Total pay before personal deductions.
    pub gross_salary: Decimal,
    /// Amount paid to the employee.
    pub net_salary: Decimal,
    /// Total employer expense.
    pub total_company_cost: Decimal,

    /// Attendance totals for the period.
    pub attendance: AttendanceSummary,
    /// Compensation/penalty amounts applied this period.
    pub adjustments: Vec<AdjustmentLine>,
    /// Workflow state.
    pub status: PayrollStatus,
    /// Composition audit trace.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Gross salary recomputed from the stored components.
    pub fn expected_gross(&self) -> Decimal {
        self.basic_salary_total
            + self.performance_salary
            + self.allowance_total
            + self.overtime_pay_total
            + self.non_compete_compensation
            + self.bonus_total
            - self.deduction_total
    }

    /// Net salary recomputed from the stored gross.
    pub fn expected_net(&self) -> Decimal {
        self.gross_salary - self.income_tax - self.personal_contribution_total
    }

    /// Company cost recomputed from the stored gross.
    pub fn expected_cost(&self) -> Decimal {
        self.gross_salary + self.company_contribution_total
    }

    /// The calculation stage of the workflow.
    pub fn calculation_status(&self) -> CalculationStatus {
        match self.status {
            PayrollStatus::Draft => CalculationStatus::Draft,
            _ => CalculationStatus::Calculated,
        }
    }

    /// The approval stage of the workflow.
    pub fn approval_status(&self) -> ApprovalStatus {
        match self.status {
            PayrollStatus::Draft | PayrollStatus::Calculated => ApprovalStatus::Pending,
            PayrollStatus::Approved | PayrollStatus::Paid => ApprovalStatus::Approved,
            PayrollStatus::Rejected => ApprovalStatus::Rejected,
        }
    }

    /// The payment stage of the workflow.
    pub fn payment_status(&self) -> PaymentStatus {
        match self.status {
            PayrollStatus::Paid => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueCode;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_overtime_buckets_by_day_kind() {
        let mut buckets = OvertimeBuckets::default();
        buckets.add(DayKind::Saturday, dec("2.5"));
        buckets.add(DayKind::Holiday, dec("1"));
        buckets.add(DayKind::Saturday, dec("0.5"));

        assert_eq!(buckets.get(DayKind::Saturday), dec("3.0"));
        assert_eq!(buckets.get(DayKind::Workday), Decimal::ZERO);
        assert_eq!(buckets.total(), dec("4.0"));
        assert_eq!(buckets.non_zero_count(), 2);
    }

    #[test]
    fn test_untyped_leave_counts_as_other() {
        let mut leave = LeaveHours::default();
        leave.add(None, dec("4"));
        leave.add(Some(LeaveType::Sick), dec("8"));
        assert_eq!(leave.other, dec("4"));
        assert_eq!(leave.total(), dec("12"));
    }

    #[test]
    fn test_attendance_rate() {
        let summary = AttendanceSummary {
            expected_work_days: 20,
            actual_work_days: 15,
            ..AttendanceSummary::default()
        };
        assert_eq!(summary.attendance_rate(), Some(dec("0.75")));
        assert_eq!(AttendanceSummary::default().attendance_rate(), None);
    }

    #[test]
    fn test_push_step_numbers_sequentially() {
        let mut trace = AuditTrace::default();
        trace.push_step("a", "A", serde_json::json!({}), serde_json::json!({}), "first".into());
        trace.push_step("b", "B", serde_json::json!({}), serde_json::json!({}), "second".into());

        let numbers: Vec<u32> = trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_attach_warnings_deduplicates() {
        let mut trace = AuditTrace::default();
        let warning = Issue::warning(IssueCode::NegativeNetSalary, None, "net below zero");
        trace.attach_warnings(vec![warning.clone(), warning.clone()]);
        trace.attach_warnings(vec![warning]);
        assert_eq!(trace.warnings.len(), 1);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PayrollStatus::Calculated).unwrap(),
            "\"calculated\""
        );
        let status: PayrollStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, PayrollStatus::Rejected);
    }
}
