//! Calculation logic for the payroll engine.
//!
//! This module contains effective-dated version resolution, attendance
//! aggregation, social-security contributions, performance pay,
//! compensation/penalty proration, overtime pay and attendance deductions,
//! the payroll composer and validator, the status workflow and the batch
//! runner.

mod attendance;
mod attendance_pay;
mod batch;
mod compensation;
mod composer;
mod effective_dated;
mod performance;
mod rounding;
mod social_security;
mod validator;
mod workflow;

pub use attendance::{DailyAttendance, aggregate_attendance, evaluate_day};
pub use attendance_pay::{
    AttendancePayResult, calculate_attendance_pay, earns_full_attendance, hourly_rate,
};
pub use batch::{BatchOutcome, BatchReport, PayrollBatch};
pub use compensation::{
    amount_due, apply_execution, installment_amount, next_payable_amount, recompute_installment,
};
pub use composer::{
    MAX_INPUT_MAGNITUDE, PayrollComposer, PayrollInputs, payroll_result_id, verify_totals,
};
pub use effective_dated::{
    EffectiveDated, InputCategory, Versioned, check_non_overlapping, close_and_open, resolve,
};
pub use performance::{
    COEFFICIENT_TOLERANCE, DEFAULT_COEFFICIENT, PerformancePayResult, calculate_performance_pay,
    check_performance_record, coefficient_for_grade, coefficient_for_label, grade_for_score,
};
pub use rounding::{MONEY_TOLERANCE, duration_hours, within_tolerance};
pub use social_security::{SocialSecurityResult, calculate_social_security};
pub use validator::{PayrollValidator, ValidationReport};
pub use workflow::is_allowed_transition;
