//! Social-security contribution calculation.
//!
//! Each enrolled item contributes `round(base * rate / 100, 2)` on the
//! employee side and on the employer side. Amounts are rounded per item
//! before they are summed; rounding the sum instead gives different cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollSettings;
use crate::models::{ContributionLine, Issue, IssueCode, SocialSecurityVersion};

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Contributions computed from one social-security version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    /// One line per enrolled item.
    pub lines: Vec<ContributionLine>,
    /// Sum of the rounded employee-side amounts.
    pub personal_total: Decimal,
    /// Sum of the rounded employer-side amounts.
    pub company_total: Decimal,
    /// Advisory findings, e.g. a disabled version.
    pub warnings: Vec<Issue>,
}

/// Computes contributions for a social-security version.
///
/// A disabled version yields no lines, zero totals and a
/// `SocialSecurityDisabled` warning. Items the employee is not enrolled in
/// are skipped.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_social_security;
/// use payroll_engine::config::PayrollSettings;
/// use payroll_engine::models::{ContributionItem, SocialSecurityVersion};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let version = SocialSecurityVersion {
///     employee_id: "emp_001".to_string(),
///     pension: ContributionItem {
///         base: Decimal::new(5000, 0),
///         personal_rate: Decimal::new(8, 0),
///         company_rate: Decimal::new(16, 0),
///         enrolled: true,
///     },
///     medical: ContributionItem::default(),
///     unemployment: ContributionItem::default(),
///     work_injury: ContributionItem::default(),
///     maternity: ContributionItem::default(),
///     housing_fund: ContributionItem::default(),
///     is_enabled: true,
///     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     effective_to: None,
///     is_active: true,
/// };
///
/// let result = calculate_social_security(&version, &PayrollSettings::default());
/// assert_eq!(result.personal_total, Decimal::new(400, 0));
/// assert_eq!(result.company_total, Decimal::new(800, 0));
/// ```
pub fn calculate_social_security(
    version: &SocialSecurityVersion,
    settings: &PayrollSettings,
) -> SocialSecurityResult {
    if !version.is_enabled {
        return SocialSecurityResult {
            lines: Vec::new(),
            personal_total: Decimal::ZERO,
            company_total: Decimal::ZERO,
            warnings: vec![Issue::warning(
                IssueCode::SocialSecurityDisabled,
                Some("social_security"),
                format!(
                    "Social-security version effective {} is disabled; no contributions taken",
                    version.effective_from
                ),
            )],
        };
    }

    let lines: Vec<ContributionLine> = version
        .items()
        .into_iter()
        .filter(|(_, item)| item.enrolled)
        .map(|(kind, item)| ContributionLine {
            kind,
            base: item.base,
            personal_amount: settings.round_money(item.base * item.personal_rate / HUNDRED),
            company_amount: settings.round_money(item.base * item.company_rate / HUNDRED),
        })
        .collect();

    let personal_total: Decimal = lines.iter().map(|l| l.personal_amount).sum();
    let company_total: Decimal = lines.iter().map(|l| l.company_amount).sum();

    SocialSecurityResult {
        lines,
        personal_total,
        company_total,
        warnings: Vec::new(),
    }
}
