//! Compensation and penalty proration.
//!
//! A [`CompensationPenalty`] is paid either in full in its effective period
//! or in equal monthly installments, the last of which absorbs the rounding
//! remainder so the installments sum exactly to the total.
//!
//! [`amount_due`] is a pure schedule lookup and may be called any number of
//! times, for previews or for a real composition. Proration state changes
//! only through [`apply_execution`]; concurrent executions against the same
//! record must be serialized by the caller.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationPenalty, ExecutionEntry, ExecutionState, PayrollPeriod};

use super::rounding::MONEY_TOLERANCE;

/// Installment count used for a record that is not one-time but has no
/// installment count.
const MIN_INSTALLMENTS: u32 = 1;

/// The regular installment: `round(amount / installment_months, 2)`,
/// halves away from zero.
///
/// ```
/// use payroll_engine::calculation::installment_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(installment_amount(Decimal::new(1000, 0), 3), Decimal::new(33333, 2));
/// assert_eq!(installment_amount(Decimal::new(-1000, 0), 3), Decimal::new(-33333, 2));
/// ```
pub fn installment_amount(amount: Decimal, installment_months: u32) -> Decimal {
    let months = installment_months.max(MIN_INSTALLMENTS);
    (amount / Decimal::from(months)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The signed amount of `record` attributable to `period`.
///
/// Returns zero when the record is not payable (inactive, not approved or
/// cancelled) or the period falls outside its schedule. A one-time record
/// is due only in its effective period. For installments, month `k`
/// (0-based from the effective period) pays the regular installment, and
/// the final month pays `amount - (n - 1) * installment`.
///
/// This function never mutates the record.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::amount_due;
/// use payroll_engine::models::{
///     AdjustmentKind, ApprovalState, CompensationPenalty, ExecutionState, PayrollPeriod,
/// };
/// use rust_decimal::Decimal;
///
/// let record = CompensationPenalty {
///     id: "adj_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     kind: AdjustmentKind::Compensation,
///     amount: Decimal::new(1000, 0),
///     is_one_time: false,
///     installment_months: 3,
///     monthly_amount: Decimal::ZERO,
///     processed_months: 0,
///     remaining_amount: Decimal::new(1000, 0),
///     effective_period: PayrollPeriod::new(2024, 1).unwrap(),
///     approval: ApprovalState::Approved,
///     execution: ExecutionState::Pending,
///     is_active: true,
///     executions: vec![],
/// };
///
/// let march = PayrollPeriod::new(2024, 3).unwrap();
/// assert_eq!(amount_due(&record, march), Decimal::new(33334, 2));
/// ```
pub fn amount_due(record: &CompensationPenalty, period: PayrollPeriod) -> Decimal {
    if !record.is_payable() {
        return Decimal::ZERO;
    }

    let k = record.effective_period.months_until(period);

    if record.is_one_time {
        return if k == 0 { record.amount } else { Decimal::ZERO };
    }

    let months = record.installment_months.max(MIN_INSTALLMENTS);
    if k < 0 || k >= i64::from(months) {
        return Decimal::ZERO;
    }

    let installment = installment_amount(record.amount, months);
    if k == i64::from(months) - 1 {
        record.amount - installment * Decimal::from(months - 1)
    } else {
        installment
    }
}

/// Recomputes `monthly_amount` and `remaining_amount` from the record's
/// total and progress.
///
/// One-time records: `monthly_amount = amount`, remaining is zero once
/// executed and `|amount|` otherwise. Installment records:
/// `monthly_amount = round(amount / n, 2)` and
/// `remaining_amount = |amount| - processed_months * |monthly_amount|`,
/// clamped at zero. In the final month the remaining amount (not the
/// regular installment) is what is payable; see [`next_payable_amount`].
pub fn recompute_installment(record: &mut CompensationPenalty) {
    if record.is_one_time {
        record.monthly_amount = record.amount;
        record.remaining_amount = if record.is_executed() {
            Decimal::ZERO
        } else {
            record.amount.abs()
        };
        return;
    }

    let monthly = installment_amount(record.amount, record.installment_months);
    record.monthly_amount = monthly;
    record.remaining_amount = (record.amount.abs()
        - Decimal::from(record.processed_months) * monthly.abs())
    .max(Decimal::ZERO);
}

/// The signed amount the next execution is expected to pay.
///
/// Zero when the record is not payable or already executed. The final
/// installment pays the remaining amount, and so does a settling payment
/// once every installment was processed but something is still owed.
pub fn next_payable_amount(record: &CompensationPenalty) -> Decimal {
    if !record.is_payable() || record.is_executed() {
        return Decimal::ZERO;
    }
    if record.is_one_time {
        return record.amount;
    }

    let months = record.installment_months.max(MIN_INSTALLMENTS);
    if record.processed_months >= months - 1 {
        with_sign_of(record.remaining_amount, record.amount)
    } else {
        installment_amount(record.amount, months)
    }
}

/// Records a payment against `record`.
///
/// For installment records this increments `processed_months`, reduces
/// `remaining_amount` by the executed magnitude (clamped at zero) and marks
/// the record executed once nothing remains. A one-time record is marked
/// executed when the payment matches its amount within one cent. Every
/// payment is appended to the execution log.
///
/// Once every installment was processed, an underpaid record still owes
/// its remaining amount. One settling payment of exactly that amount
/// (within one cent) is accepted and marks the record executed.
///
/// A fresh record (nothing processed, empty log) has its installment
/// figures computed first.
///
/// # Errors
///
/// Returns `InvalidAdjustment` if the record is not payable or already
/// executed, if the payment is zero or has the opposite sign to the
/// record, if it exceeds the remaining amount, if a settling payment does
/// not clear the remaining amount, or if a one-time payment does not match
/// the amount.
pub fn apply_execution(
    record: &mut CompensationPenalty,
    executed_amount: Decimal,
    executor: &str,
) -> EngineResult<()> {
    if !record.is_payable() {
        return Err(invalid(record, "record is not approved and active"));
    }
    if record.is_executed() {
        return Err(invalid(record, "record is already fully executed"));
    }
    if executed_amount.is_zero() || executed_amount.is_sign_negative() != record.amount.is_sign_negative() {
        return Err(invalid(
            record,
            &format!(
                "executed amount {} does not match the sign of {}",
                executed_amount, record.amount
            ),
        ));
    }

    // Work on a copy so a rejected payment leaves the record untouched.
    let mut updated = record.clone();
    if updated.processed_months == 0 && updated.executions.is_empty() {
        recompute_installment(&mut updated);
    }

    if updated.is_one_time {
        if (executed_amount - updated.amount).abs() >= MONEY_TOLERANCE {
            return Err(invalid(
                record,
                &format!(
                    "one-time payment {} does not match amount {}",
                    executed_amount, updated.amount
                ),
            ));
        }
        updated.processed_months = 1;
        updated.remaining_amount = Decimal::ZERO;
        updated.execution = ExecutionState::Executed;
    } else {
        let months = updated.installment_months.max(MIN_INSTALLMENTS);
        if updated.processed_months >= months
            && (executed_amount.abs() - updated.remaining_amount).abs() >= MONEY_TOLERANCE
        {
            return Err(invalid(
                record,
                &format!(
                    "all {} installments processed; a settling payment must clear the remaining {}",
                    months, updated.remaining_amount
                ),
            ));
        }
        if executed_amount.abs() > updated.remaining_amount + MONEY_TOLERANCE {
            return Err(invalid(
                record,
                &format!(
                    "payment {} exceeds remaining amount {}",
                    executed_amount.abs(),
                    updated.remaining_amount
                ),
            ));
        }

        updated.processed_months += 1;
        updated.remaining_amount =
            (updated.remaining_amount - executed_amount.abs()).max(Decimal::ZERO);
        updated.execution = if updated.remaining_amount.is_zero() {
            ExecutionState::Executed
        } else {
            ExecutionState::InProgress
        };
    }

    let sequence = updated.executions.len() as u32 + 1;
    updated.executions.push(ExecutionEntry {
        sequence,
        amount: executed_amount,
        executor: executor.to_string(),
    });
    *record = updated;

    tracing::info!(
        record_id = %record.id,
        employee_id = %record.employee_id,
        sequence,
        amount = %executed_amount,
        remaining = %record.remaining_amount,
        executor,
        "Applied compensation/penalty execution"
    );

    Ok(())
}

fn with_sign_of(magnitude: Decimal, signed: Decimal) -> Decimal {
    if signed.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

fn invalid(record: &CompensationPenalty, message: &str) -> EngineError {
    EngineError::InvalidAdjustment {
        record_id: record.id.clone(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdjustmentKind, ApprovalState};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period(year: i32, month: u32) -> PayrollPeriod {
        PayrollPeriod::new(year, month).unwrap()
    }

    fn installment(amount: &str, months: u32) -> CompensationPenalty {
        CompensationPenalty {
            id: "adj_001".to_string(),
            employee_id: "emp_001".to_string(),
            kind: AdjustmentKind::Compensation,
            amount: dec(amount),
            is_one_time: false,
            installment_months: months,
            monthly_amount: Decimal::ZERO,
            processed_months: 0,
            remaining_amount: dec(amount).abs(),
            effective_period: period(2024, 1),
            approval: ApprovalState::Approved,
            execution: ExecutionState::Pending,
            is_active: true,
            executions: vec![],
        }
    }

    fn one_time(amount: &str) -> CompensationPenalty {
        CompensationPenalty {
            is_one_time: true,
            installment_months: 0,
            effective_period: period(2024, 3),
            ..installment(amount, 0)
        }
    }

    // PRO-001: one-time 900 at 2024-03
    #[test]
    fn test_one_time_due_only_in_effective_period() {
        let record = one_time("900");

        assert_eq!(amount_due(&record, period(2024, 3)), dec("900"));
        assert_eq!(amount_due(&record, period(2024, 2)), Decimal::ZERO);
        assert_eq!(amount_due(&record, period(2024, 4)), Decimal::ZERO);
        assert_eq!(amount_due(&record, period(2025, 3)), Decimal::ZERO);
    }

    // PRO-002: 1000 over 3 months
    #[test]
    fn test_installment_schedule_absorbs_remainder_in_final_month() {
        let record = installment("1000", 3);

        let schedule: Vec<Decimal> = (1..=4).map(|m| amount_due(&record, period(2024, m))).collect();
        assert_eq!(schedule, vec![dec("333.33"), dec("333.33"), dec("333.34"), Decimal::ZERO]);
        assert_eq!(schedule.iter().copied().sum::<Decimal>(), dec("1000"));
        assert_eq!(amount_due(&record, period(2023, 12)), Decimal::ZERO);
    }

    #[test]
    fn test_negative_installments() {
        let record = installment("-1000", 3);
        let total: Decimal = (1..=3).map(|m| amount_due(&record, period(2024, m))).sum();
        assert_eq!(amount_due(&record, period(2024, 1)), dec("-333.33"));
        assert_eq!(total, dec("-1000"));
    }

    #[test]
    fn test_unpayable_record_is_never_due() {
        let mut record = one_time("900");
        record.approval = ApprovalState::Pending;
        assert_eq!(amount_due(&record, period(2024, 3)), Decimal::ZERO);

        record.approval = ApprovalState::Approved;
        record.execution = ExecutionState::Cancelled;
        assert_eq!(amount_due(&record, period(2024, 3)), Decimal::ZERO);
    }

    #[test]
    fn test_amount_due_does_not_mutate() {
        let record = installment("1000", 3);
        let before = record.clone();
        let _ = amount_due(&record, period(2024, 2));
        let _ = amount_due(&record, period(2024, 2));
        assert_eq!(record, before);
    }

    // PRO-003: recompute at the final month
    #[test]
    fn test_recompute_installment_final_month_remaining() {
        let mut record = installment("1000", 3);
        recompute_installment(&mut record);
        assert_eq!(record.monthly_amount, dec("333.33"));
        assert_eq!(record.remaining_amount, dec("1000"));

        record.processed_months = 2;
        recompute_installment(&mut record);
        assert_eq!(record.remaining_amount, dec("333.34"));
        assert_eq!(next_payable_amount(&record), dec("333.34"));
    }

    #[test]
    fn test_recompute_one_time() {
        let mut record = one_time("-300");
        recompute_installment(&mut record);
        assert_eq!(record.monthly_amount, dec("-300"));
        assert_eq!(record.remaining_amount, dec("300"));

        record.execution = ExecutionState::Executed;
        recompute_installment(&mut record);
        assert_eq!(record.remaining_amount, Decimal::ZERO);
    }

    // PRO-004: executing the full schedule pays exactly the total
    #[test]
    fn test_apply_execution_over_full_schedule() {
        let mut record = installment("1000", 3);

        for _ in 0..3 {
            let payment = next_payable_amount(&record);
            apply_execution(&mut record, payment, "payroll_admin").unwrap();
        }

        assert_eq!(record.execution, ExecutionState::Executed);
        assert_eq!(record.processed_months, 3);
        assert_eq!(record.remaining_amount, Decimal::ZERO);
        assert_eq!(record.paid_total(), dec("1000"));
        let amounts: Vec<Decimal> = record.executions.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec("333.33"), dec("333.33"), dec("333.34")]);
        assert_eq!(record.executions[2].sequence, 3);
    }

    // PRO-005: an underpaid schedule settles with one final payment
    #[test]
    fn test_apply_execution_settles_underpaid_schedule() {
        let mut record = installment("1000", 3);
        for _ in 0..3 {
            apply_execution(&mut record, dec("300"), "hr").unwrap();
        }
        assert_eq!(record.execution, ExecutionState::InProgress);
        assert_eq!(record.processed_months, 3);
        assert_eq!(record.remaining_amount, dec("100"));
        assert_eq!(next_payable_amount(&record), dec("100"));

        // a partial settlement would leave the record stuck again
        let before = record.clone();
        let result = apply_execution(&mut record, dec("60"), "hr");
        assert!(matches!(result, Err(EngineError::InvalidAdjustment { .. })));
        assert_eq!(record, before);

        apply_execution(&mut record, dec("100"), "hr").unwrap();
        assert_eq!(record.execution, ExecutionState::Executed);
        assert_eq!(record.remaining_amount, Decimal::ZERO);
        assert_eq!(record.paid_total(), dec("1000"));
        assert_eq!(next_payable_amount(&record), Decimal::ZERO);
    }

    #[test]
    fn test_settling_payment_keeps_sign_for_penalties() {
        let mut record = installment("-900", 3);
        for _ in 0..3 {
            apply_execution(&mut record, dec("-250"), "hr").unwrap();
        }
        assert_eq!(next_payable_amount(&record), dec("-150"));

        apply_execution(&mut record, dec("-150"), "hr").unwrap();
        assert!(record.is_executed());
    }

    #[test]
    fn test_apply_execution_in_progress_keeps_invariant() {
        let mut record = installment("-600", 4);
        apply_execution(&mut record, dec("-150"), "hr").unwrap();

        assert_eq!(record.execution, ExecutionState::InProgress);
        assert_eq!(record.remaining_amount, dec("450"));
        assert_eq!(record.paid_total() + record.remaining_amount, dec("600"));
    }

    #[test]
    fn test_apply_execution_rejects_executed_record() {
        let mut record = one_time("900");
        apply_execution(&mut record, dec("900"), "hr").unwrap();
        assert_eq!(record.execution, ExecutionState::Executed);
        assert_eq!(record.remaining_amount, Decimal::ZERO);

        let result = apply_execution(&mut record, dec("900"), "hr");
        assert!(matches!(result, Err(EngineError::InvalidAdjustment { .. })));
        assert_eq!(record.executions.len(), 1);
    }

    #[test]
    fn test_apply_execution_one_time_tolerance() {
        let mut record = one_time("900");
        apply_execution(&mut record, dec("899.995"), "hr").unwrap();
        assert!(record.is_executed());

        let mut off = one_time("900");
        let result = apply_execution(&mut off, dec("850"), "hr");
        assert!(matches!(result, Err(EngineError::InvalidAdjustment { .. })));
        assert_eq!(off.execution, ExecutionState::Pending);
    }

    #[test]
    fn test_apply_execution_rejects_overpayment_and_wrong_sign() {
        let mut record = installment("1000", 3);
        assert!(apply_execution(&mut record, dec("1200"), "hr").is_err());
        assert!(apply_execution(&mut record, dec("-100"), "hr").is_err());
        assert!(apply_execution(&mut record, Decimal::ZERO, "hr").is_err());
        assert_eq!(record, installment("1000", 3));
    }

    #[test]
    fn test_apply_execution_rejects_unapproved() {
        let mut record = installment("1000", 3);
        record.approval = ApprovalState::Rejected;
        let result = apply_execution(&mut record, dec("333.33"), "hr");

        match result {
            Err(EngineError::InvalidAdjustment { record_id, .. }) => assert_eq!(record_id, "adj_001"),
            _ => panic!("Expected InvalidAdjustment error"),
        }
    }
}
