//! Core data models for the payroll engine.
//!
//! This module contains the read-only inputs the engine is given, the
//! compensation/penalty record whose proration state it owns, and the
//! [`PayrollResult`] it produces.

mod attendance;
mod compensation;
mod issue;
mod payroll_result;
mod performance;
mod period;
mod rule_value;
mod salary_base;
mod social_security;

pub use attendance::{AttendanceDay, DayKind, LeaveType};
pub use compensation::{
    AdjustmentKind, ApprovalState, CompensationPenalty, ExecutionEntry, ExecutionState,
};
pub use issue::{Issue, IssueCode, Severity};
pub use payroll_result::{
    AdjustmentLine, ApprovalStatus, AttendanceSummary, AuditStep, AuditTrace, CalculationStatus,
    ContributionLine, LeaveHours, OvertimeBuckets, PaymentStatus, PayrollResult, PayrollStatus,
};
pub use performance::{PerformanceGrade, PerformanceRecord};
pub use period::PayrollPeriod;
pub use rule_value::{ConfigRule, RuleDataType, RuleValue};
pub use salary_base::{Allowances, SalaryBaseVersion};
pub use social_security::{ContributionItem, ContributionKind, SocialSecurityVersion};
