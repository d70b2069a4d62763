//! Payroll composition.
//!
//! The [`PayrollComposer`] turns one employee's input snapshot for one
//! period into a [`PayrollResult`]:
//!
//! 1. Resolve the salary base and social-security versions effective on the
//!    last day of the period.
//! 2. Aggregate attendance and price it (overtime pay, deductions, bonus).
//! 3. Compute performance pay and social-security contributions.
//! 4. Prorate compensations and penalties into the period.
//! 5. Assemble the totals:
//!    - `gross = basic + performance + allowance + overtime + non_compete + bonus - deduction`
//!    - `net = gross - income_tax - personal_contributions`
//!    - `cost = gross + company_contributions`
//!
//! Composition is a pure function of its inputs: the result id is derived
//! from employee and period and no clock is read, so recomposing unchanged
//! inputs gives an identical result. Results start in `Draft`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PayrollSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdjustmentKind, AdjustmentLine, AttendanceDay, AuditTrace, CompensationPenalty, PayrollPeriod,
    PayrollResult, PayrollStatus, PerformanceRecord, SalaryBaseVersion, SocialSecurityVersion,
};

use super::attendance::aggregate_attendance;
use super::attendance_pay::calculate_attendance_pay;
use super::compensation::amount_due;
use super::effective_dated::resolve;
use super::performance::calculate_performance_pay;
use super::rounding::{checked_sum, within_tolerance};
use super::social_security::calculate_social_security;

/// Everything needed to compose one employee's payroll for one period.
///
/// Version lists may hold the employee's full history; attendance rows and
/// adjustments outside the period or for other employees are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInputs {
    /// The employee to pay.
    pub employee_id: String,
    /// The period to pay.
    pub period: PayrollPeriod,
    /// The calculation date, used to reject future periods.
    pub as_of: NaiveDate,
    /// Salary base versions.
    pub salary_bases: Vec<SalaryBaseVersion>,
    /// Social-security versions.
    pub social_security: Vec<SocialSecurityVersion>,
    /// Attendance rows.
    #[serde(default)]
    pub attendance: Vec<AttendanceDay>,
    /// The period's appraisal, if any.
    #[serde(default)]
    pub performance: Option<PerformanceRecord>,
    /// Compensation/penalty records that may reach the period.
    #[serde(default)]
    pub adjustments: Vec<CompensationPenalty>,
    /// Pre-computed income tax.
    #[serde(default)]
    pub income_tax: Decimal,
}

/// Largest magnitude accepted for any amount, rate or hour count in
/// [`PayrollInputs`]: one trillion.
pub const MAX_INPUT_MAGNITUDE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Adjustment amounts routed into result fields.
#[derive(Debug, Default)]
struct RoutedAdjustments {
    lines: Vec<AdjustmentLine>,
    non_compete: Decimal,
    other_bonus: Decimal,
    other_deduction: Decimal,
}

/// The deterministic id of the payroll for `employee_id` in `period`.
///
/// ```
/// use payroll_engine::calculation::payroll_result_id;
/// use payroll_engine::models::PayrollPeriod;
///
/// let period = PayrollPeriod::new(2024, 3).unwrap();
/// assert_eq!(payroll_result_id("emp_001", period), payroll_result_id("emp_001", period));
/// assert_ne!(payroll_result_id("emp_001", period), payroll_result_id("emp_002", period));
/// ```
pub fn payroll_result_id(employee_id: &str, period: PayrollPeriod) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("payroll:{}:{}", employee_id, period).as_bytes(),
    )
}

/// Composes payroll results.
#[derive(Debug, Clone, Default)]
pub struct PayrollComposer {
    settings: PayrollSettings,
}

impl PayrollComposer {
    /// Creates a composer with the given settings.
    pub fn new(settings: PayrollSettings) -> Self {
        Self { settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Composes the payroll for one employee and period.
    ///
    /// # Errors
    ///
    /// - `MissingInput` when no salary base or social-security version is
    ///   effective on the last day of the period.
    /// - `CalculationError` when an input exceeds [`MAX_INPUT_MAGNITUDE`] or
    ///   a salary total overflows the decimal range.
    /// - `InternalConsistency` when the assembled totals fail to reconcile
    ///   with their components.
    pub fn compose(&self, inputs: &PayrollInputs) -> EngineResult<PayrollResult> {
        let settings = &self.settings;
        let employee_id = inputs.employee_id.as_str();
        let period = inputs.period;
        let target_date = period.last_day();
        let mut trace = AuditTrace::default();

        check_input_magnitudes(inputs)?;

        let salary_base = resolve(&inputs.salary_bases, target_date, employee_id).inspect_err(|e| {
            tracing::warn!(employee_id, period = %period, error = %e, "Salary base not found");
        })?;
        let basic_salary_total = salary_base
            .basic_salary_total()
            .ok_or_else(|| overflowed(employee_id, "basic_salary_total"))?;
        let allowance_total = salary_base
            .allowance_total()
            .ok_or_else(|| overflowed(employee_id, "allowance_total"))?;
        trace.push_step(
            "salary_base_resolution",
            "Salary Base Resolution",
            serde_json::json!({ "target_date": target_date.to_string() }),
            serde_json::json!({
                "effective_from": salary_base.effective_from.to_string(),
                "basic_salary_total": basic_salary_total.to_string(),
                "allowance_total": allowance_total.to_string(),
            }),
            format!(
                "Using salary base effective {} for {}",
                salary_base.effective_from, target_date
            ),
        );

        let social_security =
            resolve(&inputs.social_security, target_date, employee_id).inspect_err(|e| {
                tracing::warn!(employee_id, period = %period, error = %e, "Social security not found");
            })?;
        trace.push_step(
            "social_security_resolution",
            "Social Security Resolution",
            serde_json::json!({ "target_date": target_date.to_string() }),
            serde_json::json!({
                "effective_from": social_security.effective_from.to_string(),
                "is_enabled": social_security.is_enabled,
            }),
            format!(
                "Using social-security version effective {} for {}",
                social_security.effective_from, target_date
            ),
        );

        let attendance = aggregate_attendance(&inputs.attendance, employee_id, period, settings);
        trace.push_step(
            "attendance_aggregation",
            "Attendance Aggregation",
            serde_json::json!({ "rows": inputs.attendance.len() }),
            serde_json::to_value(&attendance).unwrap_or_default(),
            format!(
                "{} of {} scheduled days attended; {} late, {} early leave, {} absent",
                attendance.actual_work_days,
                attendance.expected_work_days,
                attendance.late_count,
                attendance.early_leave_count,
                attendance.absence_days
            ),
        );

        let attendance_pay = calculate_attendance_pay(&attendance, basic_salary_total, settings);
        trace.push_step(
            "attendance_pay",
            "Overtime Pay and Attendance Deductions",
            serde_json::json!({
                "basic_salary_total": basic_salary_total.to_string(),
                "monthly_standard_hours": settings.monthly_standard_hours.to_string(),
            }),
            serde_json::to_value(&attendance_pay).unwrap_or_default(),
            format!(
                "Hourly rate {}; overtime pay {}",
                attendance_pay.hourly_rate, attendance_pay.overtime_pay_total
            ),
        );

        let performance_record = inputs
            .performance
            .as_ref()
            .filter(|r| r.employee_id == employee_id && r.period == period);
        let performance = calculate_performance_pay(performance_record, settings);
        trace.push_step(
            "performance_pay",
            "Performance Pay",
            serde_json::to_value(performance_record).unwrap_or_default(),
            serde_json::json!({
                "amount": performance.amount.to_string(),
                "derived_grade": performance.derived_grade.map(|g| g.to_string()),
            }),
            match performance_record {
                Some(record) => format!(
                    "{} x stored coefficient {} = {}",
                    record.performance_base, record.coefficient, performance.amount
                ),
                None => "No performance record; performance pay is zero".to_string(),
            },
        );
        trace.attach_warnings(performance.issues.iter().filter(|i| !i.is_error()).cloned());

        let contributions = calculate_social_security(social_security, settings);
        trace.push_step(
            "social_security_contributions",
            "Social Security Contributions",
            serde_json::json!({ "enrolled_items": contributions.lines.len() }),
            serde_json::json!({
                "personal_total": contributions.personal_total.to_string(),
                "company_total": contributions.company_total.to_string(),
            }),
            "Each item rounded to cents before summation".to_string(),
        );
        trace.attach_warnings(contributions.warnings.iter().cloned());

        let adjustments = route_adjustments(&inputs.adjustments, employee_id, period);
        trace.push_step(
            "adjustment_proration",
            "Compensation and Penalty Proration",
            serde_json::json!({ "records": inputs.adjustments.len() }),
            serde_json::to_value(&adjustments.lines).unwrap_or_default(),
            format!(
                "{} adjustment(s) due: non-compete {}, other bonus {}, other deduction {}",
                adjustments.lines.len(),
                adjustments.non_compete,
                adjustments.other_bonus,
                adjustments.other_deduction
            ),
        );

        let total = |field: &str, terms: &[Decimal]| {
            checked_sum(terms.iter().copied()).ok_or_else(|| overflowed(employee_id, field))
        };
        let bonus_total = total(
            "bonus_total",
            &[attendance_pay.attendance_bonus, adjustments.other_bonus],
        )?;
        let deduction_total = total(
            "deduction_total",
            &[
                attendance_pay.late_deduction,
                attendance_pay.early_leave_deduction,
                attendance_pay.absence_deduction,
                attendance_pay.leave_deduction,
                adjustments.other_deduction,
            ],
        )?;
        let gross_salary = total(
            "gross_salary",
            &[
                basic_salary_total,
                performance.amount,
                allowance_total,
                attendance_pay.overtime_pay_total,
                adjustments.non_compete,
                bonus_total,
                -deduction_total,
            ],
        )?;
        let net_salary = total(
            "net_salary",
            &[gross_salary, -inputs.income_tax, -contributions.personal_total],
        )?;
        let total_company_cost = total(
            "total_company_cost",
            &[gross_salary, contributions.company_total],
        )?;

        trace.push_step(
            "totals",
            "Gross, Net and Company Cost",
            serde_json::json!({
                "bonus_total": bonus_total.to_string(),
                "deduction_total": deduction_total.to_string(),
                "income_tax": inputs.income_tax.to_string(),
            }),
            serde_json::json!({
                "gross_salary": gross_salary.to_string(),
                "net_salary": net_salary.to_string(),
                "total_company_cost": total_company_cost.to_string(),
            }),
            format!(
                "Gross {} - tax {} - personal contributions {} = net {}",
                gross_salary, inputs.income_tax, contributions.personal_total, net_salary
            ),
        );

        let result = PayrollResult {
            id: payroll_result_id(employee_id, period),
            employee_id: employee_id.to_string(),
            period,
            salary_base_effective_from: salary_base.effective_from,
            social_security_effective_from: social_security.effective_from,
            base_salary: salary_base.base_salary,
            position_salary: salary_base.position_salary,
            skill_salary: salary_base.skill_salary,
            seniority_salary: salary_base.seniority_salary,
            basic_salary_total,
            performance_salary: performance.amount,
            allowance_total,
            hourly_rate: attendance_pay.hourly_rate,
            overtime_pay_total: attendance_pay.overtime_pay_total,
            overtime_pay: attendance_pay.overtime_pay,
            non_compete_compensation: adjustments.non_compete,
            attendance_bonus: attendance_pay.attendance_bonus,
            other_bonus: adjustments.other_bonus,
            bonus_total,
            late_deduction: attendance_pay.late_deduction,
            early_leave_deduction: attendance_pay.early_leave_deduction,
            absence_deduction: attendance_pay.absence_deduction,
            leave_deduction: attendance_pay.leave_deduction,
            other_deduction: adjustments.other_deduction,
            deduction_total,
            personal_contribution_total: contributions.personal_total,
            company_contribution_total: contributions.company_total,
            contributions: contributions.lines,
            income_tax: inputs.income_tax,
            gross_salary,
            net_salary,
            total_company_cost,
            attendance,
            adjustments: adjustments.lines,
            status: PayrollStatus::Draft,
            audit_trace: trace,
        };

        verify_totals(&result).inspect_err(|e| {
            tracing::warn!(employee_id, period = %period, error = %e, "Composed totals do not reconcile");
        })?;

        tracing::info!(
            employee_id,
            period = %period,
            gross = %result.gross_salary,
            net = %result.net_salary,
            cost = %result.total_company_cost,
            "Composed payroll"
        );

        Ok(result)
    }
}

/// Checks that every stored total equals the sum of its components.
///
/// # Errors
///
/// Returns `InternalConsistency` naming the first total that differs by a
/// cent or more.
pub fn verify_totals(result: &PayrollResult) -> EngineResult<()> {
    let checks = [
        (
            "basic_salary_total",
            result.basic_salary_total,
            result.base_salary + result.position_salary + result.skill_salary + result.seniority_salary,
        ),
        ("overtime_pay_total", result.overtime_pay_total, result.overtime_pay.total()),
        (
            "bonus_total",
            result.bonus_total,
            result.attendance_bonus + result.other_bonus,
        ),
        (
            "deduction_total",
            result.deduction_total,
            result.late_deduction
                + result.early_leave_deduction
                + result.absence_deduction
                + result.leave_deduction
                + result.other_deduction,
        ),
        (
            "personal_contribution_total",
            result.personal_contribution_total,
            result.contributions.iter().map(|c| c.personal_amount).sum::<Decimal>(),
        ),
        (
            "company_contribution_total",
            result.company_contribution_total,
            result.contributions.iter().map(|c| c.company_amount).sum::<Decimal>(),
        ),
        ("gross_salary", result.gross_salary, result.expected_gross()),
        ("net_salary", result.net_salary, result.expected_net()),
        ("total_company_cost", result.total_company_cost, result.expected_cost()),
    ];

    for (field, stored, recomputed) in checks {
        if !within_tolerance(stored, recomputed) {
            return Err(EngineError::InternalConsistency {
                employee_id: result.employee_id.clone(),
                field: field.to_string(),
                stored: stored.to_string(),
                recomputed: recomputed.to_string(),
            });
        }
    }
    Ok(())
}

/// Rejects a snapshot holding any value of the employee's beyond
/// [`MAX_INPUT_MAGNITUDE`], so no product or sum below can leave the
/// decimal range.
fn check_input_magnitudes(inputs: &PayrollInputs) -> EngineResult<()> {
    let employee_id = inputs.employee_id.as_str();
    let mut values: Vec<(&str, Decimal)> = vec![("income_tax", inputs.income_tax)];

    for version in inputs.salary_bases.iter().filter(|v| v.employee_id == employee_id) {
        let allowances = &version.allowances;
        values.extend([
            ("base_salary", version.base_salary),
            ("position_salary", version.position_salary),
            ("skill_salary", version.skill_salary),
            ("seniority_salary", version.seniority_salary),
            ("allowances.meal", allowances.meal),
            ("allowances.transport", allowances.transport),
            ("allowances.communication", allowances.communication),
            ("allowances.housing", allowances.housing),
            ("allowances.other", allowances.other),
        ]);
    }
    for version in inputs.social_security.iter().filter(|v| v.employee_id == employee_id) {
        for (_, item) in version.items() {
            values.extend([
                ("contribution.base", item.base),
                ("contribution.personal_rate", item.personal_rate),
                ("contribution.company_rate", item.company_rate),
            ]);
        }
    }
    if let Some(record) = inputs.performance.as_ref().filter(|r| r.employee_id == employee_id) {
        values.extend([
            ("performance.score", record.score),
            ("performance.coefficient", record.coefficient),
            ("performance.performance_base", record.performance_base),
        ]);
    }
    values.extend(
        inputs
            .attendance
            .iter()
            .filter(|d| d.employee_id == employee_id)
            .map(|d| ("attendance.leave_hours", d.leave_hours)),
    );
    values.extend(
        inputs
            .adjustments
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .map(|a| ("adjustment.amount", a.amount)),
    );

    match values.into_iter().find(|(_, value)| value.abs() > MAX_INPUT_MAGNITUDE) {
        None => Ok(()),
        Some((field, value)) => {
            tracing::warn!(employee_id, field, value = %value, "Input out of range");
            Err(EngineError::CalculationError {
                message: format!(
                    "{} {} for employee '{}' exceeds the supported magnitude {}",
                    field, value, employee_id, MAX_INPUT_MAGNITUDE
                ),
            })
        }
    }
}

fn overflowed(employee_id: &str, field: &str) -> EngineError {
    tracing::warn!(employee_id, field, "Salary total overflowed");
    EngineError::CalculationError {
        message: format!("{} overflowed for employee '{}'", field, employee_id),
    }
}

/// Prorates the employee's adjustments into the period and routes each
/// non-zero amount: negative amounts to `other_deduction` (as a positive
/// value), non-compete amounts to `non_compete`, the rest to `other_bonus`.
fn route_adjustments(
    records: &[CompensationPenalty],
    employee_id: &str,
    period: PayrollPeriod,
) -> RoutedAdjustments {
    let mut routed = RoutedAdjustments::default();

    for record in records.iter().filter(|r| r.employee_id == employee_id) {
        let due = amount_due(record, period);
        if due.is_zero() {
            continue;
        }

        if due.is_sign_negative() {
            routed.other_deduction += due.abs();
        } else if record.kind == AdjustmentKind::NonCompete {
            routed.non_compete += due;
        } else {
            routed.other_bonus += due;
        }

        routed.lines.push(AdjustmentLine {
            record_id: record.id.clone(),
            kind: record.kind,
            amount: due,
        });
    }

    routed
}
