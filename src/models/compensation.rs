//! Compensation and penalty model.
//!
//! A [`CompensationPenalty`] is an ad-hoc adjustment to an employee's pay,
//! paid either at once or spread over several monthly installments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// What an adjustment pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Non-compete compensation paid after or during employment.
    NonCompete,
    /// Any other compensation or award.
    Compensation,
    /// A penalty; its amount is normally negative.
    Penalty,
}

/// Approval state of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    /// Awaiting approval.
    Pending,
    /// Approved for payment.
    Approved,
    /// Rejected; never paid.
    Rejected,
}

/// Execution progress of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Nothing paid yet.
    Pending,
    /// Some installments paid.
    InProgress,
    /// Fully paid.
    Executed,
    /// Withdrawn before completion.
    Cancelled,
}

/// One recorded payment against an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEntry {
    /// 1-based payment number.
    pub sequence: u32,
    /// The signed amount actually paid.
    pub amount: Decimal,
    /// Who executed the payment.
    pub executor: String,
}

/// A one-off or installment compensation/penalty.
///
/// `amount` is signed: positive for money paid to the employee, negative
/// for money taken back. `remaining_amount` is the unpaid magnitude and is
/// never negative. Over the life of a record,
/// `Σ |executions.amount| + remaining_amount == |amount|` (±0.01).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPenalty {
    /// Record identifier.
    pub id: String,
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// What the adjustment pays for.
    pub kind: AdjustmentKind,
    /// The signed total amount.
    pub amount: Decimal,
    /// Paid in full in the effective period.
    pub is_one_time: bool,
    /// Number of monthly installments when not one-time.
    #[serde(default)]
    pub installment_months: u32,
    /// Regular installment amount (signed).
    #[serde(default)]
    pub monthly_amount: Decimal,
    /// Installments paid so far.
    #[serde(default)]
    pub processed_months: u32,
    /// Unpaid magnitude.
    #[serde(default)]
    pub remaining_amount: Decimal,
    /// First period the adjustment applies to.
    pub effective_period: PayrollPeriod,
    /// Approval state.
    pub approval: ApprovalState,
    /// Execution progress.
    pub execution: ExecutionState,
    /// Inactive records are never paid.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Payments recorded so far, oldest first.
    #[serde(default)]
    pub executions: Vec<ExecutionEntry>,
}

fn default_active() -> bool {
    true
}

impl CompensationPenalty {
    /// True when the record may contribute to a payroll.
    pub fn is_payable(&self) -> bool {
        self.is_active
            && self.approval == ApprovalState::Approved
            && self.execution != ExecutionState::Cancelled
    }

    /// True once fully paid.
    pub fn is_executed(&self) -> bool {
        self.execution == ExecutionState::Executed
    }

    /// Total magnitude paid so far according to the execution log.
    pub fn paid_total(&self) -> Decimal {
        self.executions.iter().map(|e| e.amount.abs()).sum()
    }
}
