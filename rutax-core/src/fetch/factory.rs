//! Assembles a ready-to-run calculator for one entity type, regime and year.
//!
//! Building a calculator resolves every rate and amount the combination
//! needs, so a missing table entry surfaces from
//! [`TaxCalculatorFactory::build_calculator`] rather than from a later
//! calculation. Each build owns a private cache and fetches each kind at
//! most once. The cache is dropped when the build returns; nothing is
//! shared between builds.
//!
//! | Combination | Rates | Amounts |
//! |-------------|-------|---------|
//! | every | `ndfl`, `pension`, `health`, `social` | |
//! | individual | `additional_contribution` | `self_pension`, `self_health`, `additional_contribution_limit` |
//! | USN-Income | `usn_income` | |
//! | USN-Income-Expense | `usn_income_expense`, `min_tax` | |
//! | OSN | `nds` | |
//! | organization OSN | `profit_tax` | |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use rutax_core::{
//!     CustomerTaxParameters, EntityType, FetchError, Money, Rate, TaxAmountFetcher,
//!     TaxAmountKind, TaxCalculatorFactory, TaxRateFetcher, TaxRateKind, TaxRegime,
//! };
//!
//! struct FlatRates;
//!
//! impl TaxRateFetcher for FlatRates {
//!     fn fetch_rate(&self, kind: TaxRateKind, _year: i32) -> Result<Rate, FetchError> {
//!         let value = match kind {
//!             TaxRateKind::Ndfl => dec!(0.13),
//!             TaxRateKind::UsnIncome => dec!(0.06),
//!             _ => dec!(0),
//!         };
//!         Rate::new(value).map_err(|e| FetchError::Source(e.to_string()))
//!     }
//! }
//!
//! impl TaxAmountFetcher for FlatRates {
//!     fn fetch_amount(&self, kind: TaxAmountKind, _year: i32) -> Result<Money, FetchError> {
//!         Ok(match kind {
//!             TaxAmountKind::SelfPension => Money::new(dec!(32000)),
//!             TaxAmountKind::SelfHealth => Money::new(dec!(8000)),
//!             TaxAmountKind::AdditionalContributionLimit => Money::ZERO,
//!         })
//!     }
//! }
//!
//! let factory = TaxCalculatorFactory::new(FlatRates, FlatRates);
//! let calculator = factory
//!     .build_calculator(EntityType::Individual, TaxRegime::UsnIncome, 2024)
//!     .unwrap();
//!
//! let customer = CustomerTaxParameters::new(
//!     Money::new(dec!(1000000)),
//!     Money::ZERO,
//!     Money::ZERO,
//! ).unwrap();
//! let aggregate = calculator.calculate(customer);
//!
//! assert_eq!(aggregate.total(), Money::new(dec!(60000)));
//! assert_eq!(aggregate.tax_burden(), dec!(6.00));
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::{debug, trace};

use super::fetcher::{FetchError, TaxAmountFetcher, TaxAmountKind, TaxRateFetcher, TaxRateKind};
use crate::error::TaxCalculationError;
use crate::models::{
    CommonTaxParameters, CustomerTaxParameters, EntityType, IndividualOsnParameters,
    IndividualUsnIncomeExpenseParameters, IndividualUsnIncomeParameters, InsuranceFeeParameters,
    Money, OrganizationOsnParameters, OrganizationUsnIncomeExpenseParameters,
    OrganizationUsnIncomeParameters, Rate, SelfInsuranceFee, TaxAggregate, TaxParameters,
    TaxRegime, ensure_withholding_rate,
};

/// Builds [`TaxCalculator`]s from a rate source and an amount source.
#[derive(Debug, Clone)]
pub struct TaxCalculatorFactory<R, A> {
    rate_fetcher: R,
    amount_fetcher: A,
}

impl<R, A> TaxCalculatorFactory<R, A>
where
    R: TaxRateFetcher,
    A: TaxAmountFetcher,
{
    pub fn new(
        rate_fetcher: R,
        amount_fetcher: A,
    ) -> Self {
        Self {
            rate_fetcher,
            amount_fetcher,
        }
    }

    /// Resolves the rates for `year` and returns a reusable calculator.
    ///
    /// # Errors
    ///
    /// * [`TaxCalculationError::Fetch`] when a needed rate or amount is
    ///   missing for the year.
    /// * [`TaxCalculationError::WithholdingRateTooHigh`] when the fetched
    ///   withholding rate exceeds
    ///   [`MAX_WITHHOLDING_RATE`](crate::MAX_WITHHOLDING_RATE).
    pub fn build_calculator(
        &self,
        entity_type: EntityType,
        regime: TaxRegime,
        year: i32,
    ) -> Result<TaxCalculator, TaxCalculationError> {
        let mut cache = RateCache::new(&self.rate_fetcher, &self.amount_fetcher, year);

        let ndfl_rate = cache.rate(TaxRateKind::Ndfl)?;
        ensure_withholding_rate(ndfl_rate)?;
        let insurance = cache.insurance(entity_type)?;
        let rates = RegimeRates::resolve(entity_type, regime, &mut cache)?;

        debug!(
            entity = %entity_type,
            regime = %regime,
            year,
            fetched = cache.fetched(),
            "built tax calculator"
        );

        Ok(TaxCalculator {
            year,
            insurance,
            ndfl_rate,
            rates,
        })
    }

    /// Like [`build_calculator`](Self::build_calculator), from the short
    /// codes `IP`/`ORG` and `USN6`/`USN15`/`OSN`.
    ///
    /// # Errors
    ///
    /// [`TaxCalculationError::UnsupportedCombination`] when either code is
    /// unknown, otherwise as [`build_calculator`](Self::build_calculator).
    pub fn build_calculator_by_code(
        &self,
        entity: &str,
        regime: &str,
        year: i32,
    ) -> Result<TaxCalculator, TaxCalculationError> {
        let unsupported = || TaxCalculationError::UnsupportedCombination {
            entity: entity.to_string(),
            regime: regime.to_string(),
        };

        let entity_type = EntityType::parse(entity).ok_or_else(unsupported)?;
        let tax_regime = TaxRegime::parse(regime).ok_or_else(unsupported)?;

        self.build_calculator(entity_type, tax_regime, year)
    }

    /// Builds a calculator for the current calendar year of the local clock.
    ///
    /// # Errors
    ///
    /// As [`build_calculator`](Self::build_calculator).
    pub fn build_calculator_for_current_year(
        &self,
        entity_type: EntityType,
        regime: TaxRegime,
    ) -> Result<TaxCalculator, TaxCalculationError> {
        self.build_calculator(entity_type, regime, Local::now().year())
    }
}

/// Rates and amounts fetched during one build, keyed by kind.
struct RateCache<'a, R, A> {
    rate_fetcher: &'a R,
    amount_fetcher: &'a A,
    year: i32,
    rates: HashMap<TaxRateKind, Rate>,
    amounts: HashMap<TaxAmountKind, Money>,
}

impl<'a, R, A> RateCache<'a, R, A>
where
    R: TaxRateFetcher,
    A: TaxAmountFetcher,
{
    fn new(
        rate_fetcher: &'a R,
        amount_fetcher: &'a A,
        year: i32,
    ) -> Self {
        Self {
            rate_fetcher,
            amount_fetcher,
            year,
            rates: HashMap::new(),
            amounts: HashMap::new(),
        }
    }

    fn rate(
        &mut self,
        kind: TaxRateKind,
    ) -> Result<Rate, FetchError> {
        match self.rates.entry(kind) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let rate = self.rate_fetcher.fetch_rate(kind, self.year)?;
                debug!(kind = %kind, year = self.year, rate = %rate, "fetched tax rate");
                Ok(*entry.insert(rate))
            }
        }
    }

    fn amount(
        &mut self,
        kind: TaxAmountKind,
    ) -> Result<Money, FetchError> {
        match self.amounts.entry(kind) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let amount = self.amount_fetcher.fetch_amount(kind, self.year)?;
                debug!(kind = %kind, year = self.year, amount = %amount, "fetched tax amount");
                Ok(*entry.insert(amount))
            }
        }
    }

    /// Organizations never owe the additional contribution, so its rate and
    /// boundary are not fetched for them.
    fn insurance(
        &mut self,
        entity_type: EntityType,
    ) -> Result<InsuranceFeeParameters, FetchError> {
        let (additional_contribution_rate, free_income_boundary) = match entity_type {
            EntityType::Individual => (
                self.rate(TaxRateKind::AdditionalContribution)?,
                self.amount(TaxAmountKind::AdditionalContributionLimit)?,
            ),
            EntityType::Organization => (Rate::ZERO, Money::ZERO),
        };

        Ok(InsuranceFeeParameters {
            pension_rate: self.rate(TaxRateKind::Pension)?,
            health_rate: self.rate(TaxRateKind::Health)?,
            social_rate: self.rate(TaxRateKind::Social)?,
            additional_contribution_rate,
            free_income_boundary,
        })
    }

    fn self_insurance_fee(&mut self) -> Result<SelfInsuranceFee, FetchError> {
        Ok(SelfInsuranceFee::new(
            self.amount(TaxAmountKind::SelfPension)?,
            self.amount(TaxAmountKind::SelfHealth)?,
        ))
    }

    fn fetched(&self) -> usize {
        self.rates.len() + self.amounts.len()
    }
}

/// The regime-specific part of a calculator's resolved inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum RegimeRates {
    IndividualUsnIncome {
        self_insurance_fee: SelfInsuranceFee,
        usn_rate: Rate,
    },
    IndividualUsnIncomeExpense {
        self_insurance_fee: SelfInsuranceFee,
        usn_rate: Rate,
        min_tax_rate: Rate,
    },
    IndividualOsn {
        self_insurance_fee: SelfInsuranceFee,
        nds_rate: Rate,
    },
    OrganizationUsnIncome {
        usn_rate: Rate,
    },
    OrganizationUsnIncomeExpense {
        usn_rate: Rate,
        min_tax_rate: Rate,
    },
    OrganizationOsn {
        nds_rate: Rate,
        profit_tax_rate: Rate,
    },
}

impl RegimeRates {
    fn resolve<R, A>(
        entity_type: EntityType,
        regime: TaxRegime,
        cache: &mut RateCache<'_, R, A>,
    ) -> Result<Self, FetchError>
    where
        R: TaxRateFetcher,
        A: TaxAmountFetcher,
    {
        let rates = match (entity_type, regime) {
            (EntityType::Individual, TaxRegime::UsnIncome) => Self::IndividualUsnIncome {
                self_insurance_fee: cache.self_insurance_fee()?,
                usn_rate: cache.rate(TaxRateKind::UsnIncome)?,
            },
            (EntityType::Individual, TaxRegime::UsnIncomeExpense) => {
                Self::IndividualUsnIncomeExpense {
                    self_insurance_fee: cache.self_insurance_fee()?,
                    usn_rate: cache.rate(TaxRateKind::UsnIncomeExpense)?,
                    min_tax_rate: cache.rate(TaxRateKind::MinTax)?,
                }
            }
            (EntityType::Individual, TaxRegime::Osn) => Self::IndividualOsn {
                self_insurance_fee: cache.self_insurance_fee()?,
                nds_rate: cache.rate(TaxRateKind::Nds)?,
            },
            (EntityType::Organization, TaxRegime::UsnIncome) => Self::OrganizationUsnIncome {
                usn_rate: cache.rate(TaxRateKind::UsnIncome)?,
            },
            (EntityType::Organization, TaxRegime::UsnIncomeExpense) => {
                Self::OrganizationUsnIncomeExpense {
                    usn_rate: cache.rate(TaxRateKind::UsnIncomeExpense)?,
                    min_tax_rate: cache.rate(TaxRateKind::MinTax)?,
                }
            }
            (EntityType::Organization, TaxRegime::Osn) => Self::OrganizationOsn {
                nds_rate: cache.rate(TaxRateKind::Nds)?,
                profit_tax_rate: cache.rate(TaxRateKind::ProfitTax)?,
            },
        };
        Ok(rates)
    }

    fn entity_type(&self) -> EntityType {
        match self {
            Self::IndividualUsnIncome { .. }
            | Self::IndividualUsnIncomeExpense { .. }
            | Self::IndividualOsn { .. } => EntityType::Individual,
            Self::OrganizationUsnIncome { .. }
            | Self::OrganizationUsnIncomeExpense { .. }
            | Self::OrganizationOsn { .. } => EntityType::Organization,
        }
    }

    fn regime(&self) -> TaxRegime {
        match self {
            Self::IndividualUsnIncome { .. } | Self::OrganizationUsnIncome { .. } => {
                TaxRegime::UsnIncome
            }
            Self::IndividualUsnIncomeExpense { .. } | Self::OrganizationUsnIncomeExpense { .. } => {
                TaxRegime::UsnIncomeExpense
            }
            Self::IndividualOsn { .. } | Self::OrganizationOsn { .. } => TaxRegime::Osn,
        }
    }

    fn parameters(
        self,
        common: CommonTaxParameters,
    ) -> TaxParameters {
        match self {
            Self::IndividualUsnIncome {
                self_insurance_fee,
                usn_rate,
            } => TaxParameters::IndividualUsnIncome(IndividualUsnIncomeParameters {
                common,
                self_insurance_fee,
                usn_rate,
            }),
            Self::IndividualUsnIncomeExpense {
                self_insurance_fee,
                usn_rate,
                min_tax_rate,
            } => TaxParameters::IndividualUsnIncomeExpense(IndividualUsnIncomeExpenseParameters {
                common,
                self_insurance_fee,
                usn_rate,
                min_tax_rate,
            }),
            Self::IndividualOsn {
                self_insurance_fee,
                nds_rate,
            } => TaxParameters::IndividualOsn(IndividualOsnParameters {
                common,
                self_insurance_fee,
                nds_rate,
            }),
            Self::OrganizationUsnIncome { usn_rate } => {
                TaxParameters::OrganizationUsnIncome(OrganizationUsnIncomeParameters {
                    common,
                    usn_rate,
                })
            }
            Self::OrganizationUsnIncomeExpense {
                usn_rate,
                min_tax_rate,
            } => TaxParameters::OrganizationUsnIncomeExpense(
                OrganizationUsnIncomeExpenseParameters {
                    common,
                    usn_rate,
                    min_tax_rate,
                },
            ),
            Self::OrganizationOsn {
                nds_rate,
                profit_tax_rate,
            } => TaxParameters::OrganizationOsn(OrganizationOsnParameters {
                common,
                nds_rate,
                profit_tax_rate,
            }),
        }
    }
}

/// A calculator bound to one entity type, regime and year.
///
/// Holds only resolved values, so it can be reused and shared across threads
/// without touching the fetchers again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxCalculator {
    year: i32,
    insurance: InsuranceFeeParameters,
    ndfl_rate: Rate,
    rates: RegimeRates,
}

impl TaxCalculator {
    pub fn entity_type(&self) -> EntityType {
        self.rates.entity_type()
    }

    pub fn regime(&self) -> TaxRegime {
        self.rates.regime()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn insurance(&self) -> &InsuranceFeeParameters {
        &self.insurance
    }

    /// Combines the resolved rates with the customer's figures.
    pub fn parameters(
        &self,
        customer: CustomerTaxParameters,
    ) -> TaxParameters {
        let common =
            CommonTaxParameters::with_checked_rate(customer, self.insurance, self.ndfl_rate);
        self.rates.parameters(common)
    }

    /// Runs the calculation for one set of customer figures.
    pub fn calculate(
        &self,
        customer: CustomerTaxParameters,
    ) -> TaxAggregate {
        let aggregate = self.parameters(customer).calculate();

        trace!(
            entity = %self.entity_type(),
            regime = %self.regime(),
            year = self.year,
            total = %aggregate.total(),
            burden = %aggregate.tax_burden(),
            "calculated tax"
        );

        aggregate
    }
}
