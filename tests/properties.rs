//! Property tests for payroll invariants.
//!
//! - Composed totals always reconcile with their components
//! - Installments sum exactly to the record amount
//! - A day's overtime lands in exactly one bucket
//! - Chained version windows never overlap and always resolve

use chrono::{Datelike, NaiveDate, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use payroll_engine::calculation::{
    PayrollComposer, PayrollInputs, aggregate_attendance, amount_due, check_non_overlapping,
    close_and_open, resolve, verify_totals,
};
use payroll_engine::config::PayrollSettings;
use payroll_engine::models::{
    AdjustmentKind, Allowances, ApprovalState, AttendanceDay, CompensationPenalty,
    ContributionItem, DayKind, ExecutionState, PayrollPeriod, PerformanceRecord,
    SalaryBaseVersion, SocialSecurityVersion,
};

fn march() -> PayrollPeriod {
    PayrollPeriod::new(2024, 3).unwrap()
}

fn arb_money(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=2000).prop_map(|basis| Decimal::new(basis, 2))
}

fn arb_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn arb_day() -> impl Strategy<Value = AttendanceDay> {
    (1u32..=31, arb_time(), arb_time(), any::<bool>(), 0i64..=8).prop_map(
        |(d, check_in, check_out, is_holiday, leave)| {
            let date = NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
            AttendanceDay {
                employee_id: "emp_001".to_string(),
                date,
                day_of_week: date.weekday().number_from_monday() as u8,
                check_in: Some(check_in),
                check_out: Some(check_out),
                is_holiday,
                is_compensatory_leave: false,
                is_business_trip: false,
                is_field_work: false,
                leave_hours: Decimal::from(leave),
                leave_type: None,
            }
        },
    )
}

fn salary_base(base: Decimal, position: Decimal, meal: Decimal) -> SalaryBaseVersion {
    SalaryBaseVersion {
        employee_id: "emp_001".to_string(),
        base_salary: base,
        position_salary: position,
        skill_salary: Decimal::ZERO,
        seniority_salary: Decimal::ZERO,
        allowances: Allowances {
            meal,
            ..Allowances::default()
        },
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        effective_to: None,
        is_active: true,
    }
}

fn social_security(base: Decimal, personal: Decimal, company: Decimal) -> SocialSecurityVersion {
    let item = ContributionItem {
        base,
        personal_rate: personal,
        company_rate: company,
        enrolled: true,
    };
    SocialSecurityVersion {
        employee_id: "emp_001".to_string(),
        pension: item.clone(),
        medical: item.clone(),
        unemployment: ContributionItem::default(),
        work_injury: ContributionItem::default(),
        maternity: ContributionItem::default(),
        housing_fund: item,
        is_enabled: true,
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        effective_to: None,
        is_active: true,
    }
}

fn installment(amount: Decimal, months: u32) -> CompensationPenalty {
    CompensationPenalty {
        id: "adj_001".to_string(),
        employee_id: "emp_001".to_string(),
        kind: if amount.is_sign_negative() {
            AdjustmentKind::Penalty
        } else {
            AdjustmentKind::Compensation
        },
        amount,
        is_one_time: false,
        installment_months: months,
        monthly_amount: Decimal::ZERO,
        processed_months: 0,
        remaining_amount: amount.abs(),
        effective_period: march(),
        approval: ApprovalState::Approved,
        execution: ExecutionState::Pending,
        is_active: true,
        executions: vec![],
    }
}

proptest! {
    #[test]
    fn prop_composed_totals_reconcile(
        base in arb_money(5_000_000),
        position in arb_money(1_000_000),
        meal in arb_money(100_000),
        ss_base in arb_money(5_000_000),
        personal in arb_rate(),
        company in arb_rate(),
        coefficient in (0i64..=20).prop_map(|c| Decimal::new(c, 1)),
        income_tax in arb_money(500_000),
        days in prop::collection::vec(arb_day(), 0..10),
        penalty in (-500_000i64..=500_000).prop_filter("non-zero", |c| *c != 0),
        months in 1u32..=12,
    ) {
        let inputs = PayrollInputs {
            employee_id: "emp_001".to_string(),
            period: march(),
            as_of: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            salary_bases: vec![salary_base(base, position, meal)],
            social_security: vec![social_security(ss_base, personal, company)],
            attendance: days,
            performance: Some(PerformanceRecord {
                employee_id: "emp_001".to_string(),
                period: march(),
                score: Decimal::new(80, 0),
                grade: "A-".to_string(),
                coefficient,
                performance_base: Decimal::new(1000, 0),
            }),
            adjustments: vec![installment(Decimal::new(penalty, 2), months)],
            income_tax,
        };

        let result = PayrollComposer::default().compose(&inputs).unwrap();

        prop_assert!(verify_totals(&result).is_ok());
        prop_assert_eq!(result.gross_salary, result.expected_gross());
        prop_assert_eq!(
            result.net_salary,
            result.gross_salary - result.income_tax - result.personal_contribution_total
        );
        prop_assert_eq!(
            result.total_company_cost,
            result.gross_salary + result.company_contribution_total
        );
    }

    #[test]
    fn prop_installments_sum_to_amount(
        cents in (-10_000_000i64..=10_000_000).prop_filter("non-zero", |c| *c != 0),
        months in 1u32..=36,
    ) {
        let amount = Decimal::new(cents, 2);
        let record = installment(amount, months);

        let mut period = march();
        let mut total = Decimal::ZERO;
        for _ in 0..months {
            total += amount_due(&record, period);
            period = period.next();
        }

        prop_assert_eq!(total, amount);
        prop_assert_eq!(amount_due(&record, period), Decimal::ZERO);
    }

    #[test]
    fn prop_day_overtime_in_one_bucket(day in arb_day()) {
        let settings = PayrollSettings::default();
        let kind = day.day_kind();
        let summary = aggregate_attendance(&[day], "emp_001", march(), &settings);

        prop_assert!(summary.overtime_hours.non_zero_count() <= 1);
        for other in [DayKind::Workday, DayKind::Saturday, DayKind::Sunday, DayKind::Holiday] {
            if other != kind {
                prop_assert_eq!(summary.overtime_hours.get(other), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn prop_chained_versions_resolve(offsets in prop::collection::vec(1u64..60, 1..8)) {
        let mut versions = vec![salary_base(Decimal::new(5000, 0), Decimal::ZERO, Decimal::ZERO)];
        let mut date = versions[0].effective_from;

        for offset in offsets {
            date = date + chrono::Days::new(offset);
            let current = versions.pop().unwrap();
            let (closed, opened) = close_and_open(&current, date).unwrap();
            versions.push(closed);
            versions.push(opened);
        }

        prop_assert!(check_non_overlapping(&versions).is_ok());

        let found = resolve(&versions, date, "emp_001").unwrap();
        prop_assert_eq!(found.effective_from, date);
        prop_assert!(found.is_active);

        let before = date.pred_opt().unwrap();
        let previous = resolve(&versions, before, "emp_001").unwrap();
        prop_assert_eq!(previous.effective_to, Some(before));
    }
}
