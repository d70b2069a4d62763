//! Payroll workflow transitions.
//!
//! ```text
//! Draft --mark_calculated--> Calculated --approve--> Approved --pay--> Paid
//!   ^                            |
//!   +---------reopen--- Rejected <--reject
//! ```
//!
//! `Paid` is terminal. `mark_calculated` requires a validation report with
//! no errors.

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollResult, PayrollStatus};

use super::validator::ValidationReport;

/// True when `from -> to` is an edge of the workflow.
pub fn is_allowed_transition(from: PayrollStatus, to: PayrollStatus) -> bool {
    matches!(
        (from, to),
        (PayrollStatus::Draft, PayrollStatus::Calculated)
            | (PayrollStatus::Calculated, PayrollStatus::Approved)
            | (PayrollStatus::Calculated, PayrollStatus::Rejected)
            | (PayrollStatus::Rejected, PayrollStatus::Draft)
            | (PayrollStatus::Approved, PayrollStatus::Paid)
    )
}

impl PayrollResult {
    /// Moves a draft to `Calculated`, attaching the report's warnings.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the result is a draft.
    /// - `ValidationFailed` carrying the report's errors when any exist.
    pub fn mark_calculated(&mut self, report: &ValidationReport) -> EngineResult<()> {
        self.ensure_transition(PayrollStatus::Calculated)?;

        if report.has_errors() {
            tracing::warn!(
                employee_id = %self.employee_id,
                period = %self.period,
                errors = report.errors.len(),
                "Payroll blocked by validation errors"
            );
            return Err(EngineError::ValidationFailed {
                employee_id: self.employee_id.clone(),
                errors: report.errors.clone(),
            });
        }

        self.audit_trace.attach_warnings(report.warnings.iter().cloned());
        self.status = PayrollStatus::Calculated;
        Ok(())
    }

    /// Approves a calculated payroll.
    pub fn approve(&mut self) -> EngineResult<()> {
        self.transition(PayrollStatus::Approved)
    }

    /// Rejects a calculated payroll.
    pub fn reject(&mut self) -> EngineResult<()> {
        self.transition(PayrollStatus::Rejected)
    }

    /// Returns a rejected payroll to `Draft` for recomputation.
    pub fn reopen(&mut self) -> EngineResult<()> {
        self.transition(PayrollStatus::Draft)
    }

    /// Marks an approved payroll as paid.
    pub fn pay(&mut self) -> EngineResult<()> {
        self.transition(PayrollStatus::Paid)
    }

    fn transition(&mut self, to: PayrollStatus) -> EngineResult<()> {
        self.ensure_transition(to)?;
        tracing::debug!(
            employee_id = %self.employee_id,
            period = %self.period,
            from = %self.status,
            to = %to,
            "Payroll status changed"
        );
        self.status = to;
        Ok(())
    }

    fn ensure_transition(&self, to: PayrollStatus) -> EngineResult<()> {
        if is_allowed_transition(self.status, to) {
            Ok(())
        } else {
            tracing::warn!(
                employee_id = %self.employee_id,
                from = %self.status,
                to = %to,
                "Rejected payroll status transition"
            );
            Err(EngineError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}
