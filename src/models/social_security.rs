//! Social-security configuration model.
//!
//! A [`SocialSecurityVersion`] carries the contribution bases, rates and
//! enrollment flags of one employee over an effective window.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{EffectiveDated, InputCategory, Versioned};

/// The contribution items a social-security version can enroll in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Pension insurance.
    Pension,
    /// Medical insurance.
    Medical,
    /// Unemployment insurance.
    Unemployment,
    /// Work-injury insurance.
    WorkInjury,
    /// Maternity insurance.
    Maternity,
    /// Housing provident fund.
    HousingFund,
}

impl std::fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContributionKind::Pension => write!(f, "pension"),
            ContributionKind::Medical => write!(f, "medical"),
            ContributionKind::Unemployment => write!(f, "unemployment"),
            ContributionKind::WorkInjury => write!(f, "work_injury"),
            ContributionKind::Maternity => write!(f, "maternity"),
            ContributionKind::HousingFund => write!(f, "housing_fund"),
        }
    }
}

/// Base and rates for one contribution item.
///
/// Rates are percentages: `8` means 8% of the base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionItem {
    /// The contribution base the rates apply to.
    #[serde(default)]
    pub base: Decimal,
    /// Employee-side rate, in percent.
    #[serde(default)]
    pub personal_rate: Decimal,
    /// Employer-side rate, in percent.
    #[serde(default)]
    pub company_rate: Decimal,
    /// Whether the employee is enrolled in this item.
    #[serde(default)]
    pub enrolled: bool,
}

/// One effective-dated version of an employee's social-security setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityVersion {
    /// The employee this version belongs to.
    pub employee_id: String,
    /// Pension insurance.
    #[serde(default)]
    pub pension: ContributionItem,
    /// Medical insurance.
    #[serde(default)]
    pub medical: ContributionItem,
    /// Unemployment insurance.
    #[serde(default)]
    pub unemployment: ContributionItem,
    /// Work-injury insurance.
    #[serde(default)]
    pub work_injury: ContributionItem,
    /// Maternity insurance.
    #[serde(default)]
    pub maternity: ContributionItem,
    /// Housing provident fund.
    #[serde(default)]
    pub housing_fund: ContributionItem,
    /// Contributions are only computed for enabled versions.
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    /// First day this version applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day this version applies (inclusive); `None` while open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Whether this is the employee's current version.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl SocialSecurityVersion {
    /// All contribution items in a fixed order.
    pub fn items(&self) -> [(ContributionKind, &ContributionItem); 6] {
        [
            (ContributionKind::Pension, &self.pension),
            (ContributionKind::Medical, &self.medical),
            (ContributionKind::Unemployment, &self.unemployment),
            (ContributionKind::WorkInjury, &self.work_injury),
            (ContributionKind::Maternity, &self.maternity),
            (ContributionKind::HousingFund, &self.housing_fund),
        ]
    }
}

impl EffectiveDated for SocialSecurityVersion {
    const CATEGORY: InputCategory = InputCategory::SocialSecurity;

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

impl Versioned for SocialSecurityVersion {
    fn with_window(&self, from: NaiveDate, to: Option<NaiveDate>, is_active: bool) -> Self {
        Self {
            effective_from: from,
            effective_to: to,
            is_active,
            ..self.clone()
        }
    }
}
