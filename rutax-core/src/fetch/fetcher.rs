//! Seams to the external rate and amount tables.
//!
//! Year-dependent figures are never hard-coded in the engine. The factory
//! asks a [`TaxRateFetcher`] for rates and a [`TaxAmountFetcher`] for fixed
//! amounts, keyed by kind and tax year.
//!
//! | Kind code | Meaning |
//! |-----------|---------|
//! | `pension` | pension fund rate on gross payroll |
//! | `health` | health fund rate on gross payroll |
//! | `social` | social fund rate on gross payroll |
//! | `additional_contribution` | entrepreneur's rate above the free income boundary |
//! | `ndfl` | personal income tax rate |
//! | `usn_income` | USN rate on gross income |
//! | `usn_income_expense` | USN rate on income minus expenses |
//! | `min_tax` | minimum USN tax as a share of income |
//! | `nds` | VAT rate |
//! | `profit_tax` | organization profit tax rate |
//! | `self_pension` | entrepreneur's own fixed pension contribution (amount) |
//! | `self_health` | entrepreneur's own fixed health contribution (amount) |
//! | `additional_contribution_limit` | free income boundary (amount) |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Money, Rate};

/// Rates looked up per tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRateKind {
    Pension,
    Health,
    Social,
    AdditionalContribution,
    Ndfl,
    UsnIncome,
    UsnIncomeExpense,
    MinTax,
    Nds,
    ProfitTax,
}

impl TaxRateKind {
    pub const ALL: [Self; 10] = [
        Self::Pension,
        Self::Health,
        Self::Social,
        Self::AdditionalContribution,
        Self::Ndfl,
        Self::UsnIncome,
        Self::UsnIncomeExpense,
        Self::MinTax,
        Self::Nds,
        Self::ProfitTax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Health => "health",
            Self::Social => "social",
            Self::AdditionalContribution => "additional_contribution",
            Self::Ndfl => "ndfl",
            Self::UsnIncome => "usn_income",
            Self::UsnIncomeExpense => "usn_income_expense",
            Self::MinTax => "min_tax",
            Self::Nds => "nds",
            Self::ProfitTax => "profit_tax",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for TaxRateKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed amounts looked up per tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxAmountKind {
    SelfPension,
    SelfHealth,
    AdditionalContributionLimit,
}

impl TaxAmountKind {
    pub const ALL: [Self; 3] = [
        Self::SelfPension,
        Self::SelfHealth,
        Self::AdditionalContributionLimit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPension => "self_pension",
            Self::SelfHealth => "self_health",
            Self::AdditionalContributionLimit => "additional_contribution_limit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for TaxAmountKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("rate '{kind}' not found for year {year}")]
    RateNotFound { kind: TaxRateKind, year: i32 },

    #[error("amount '{kind}' not found for year {year}")]
    AmountNotFound { kind: TaxAmountKind, year: i32 },

    /// The backing source failed for a reason other than a missing entry.
    #[error("rate source error: {0}")]
    Source(String),
}

/// Supplies rates for a tax year.
pub trait TaxRateFetcher: Send + Sync {
    /// # Errors
    ///
    /// [`FetchError::RateNotFound`] when the source has no value for the
    /// pair. Implementations must not fall back to a default.
    fn fetch_rate(
        &self,
        kind: TaxRateKind,
        year: i32,
    ) -> Result<Rate, FetchError>;
}

/// Supplies fixed amounts for a tax year.
pub trait TaxAmountFetcher: Send + Sync {
    /// # Errors
    ///
    /// [`FetchError::AmountNotFound`] when the source has no value for the
    /// pair. Implementations must not fall back to a default.
    fn fetch_amount(
        &self,
        kind: TaxAmountKind,
        year: i32,
    ) -> Result<Money, FetchError>;
}

impl<T: TaxRateFetcher + ?Sized> TaxRateFetcher for &T {
    fn fetch_rate(
        &self,
        kind: TaxRateKind,
        year: i32,
    ) -> Result<Rate, FetchError> {
        (**self).fetch_rate(kind, year)
    }
}

impl<T: TaxRateFetcher + ?Sized> TaxRateFetcher for Arc<T> {
    fn fetch_rate(
        &self,
        kind: TaxRateKind,
        year: i32,
    ) -> Result<Rate, FetchError> {
        (**self).fetch_rate(kind, year)
    }
}

impl<T: TaxAmountFetcher + ?Sized> TaxAmountFetcher for &T {
    fn fetch_amount(
        &self,
        kind: TaxAmountKind,
        year: i32,
    ) -> Result<Money, FetchError> {
        (**self).fetch_amount(kind, year)
    }
}

impl<T: TaxAmountFetcher + ?Sized> TaxAmountFetcher for Arc<T> {
    fn fetch_amount(
        &self,
        kind: TaxAmountKind,
        year: i32,
    ) -> Result<Money, FetchError> {
        (**self).fetch_amount(kind, year)
    }
}
