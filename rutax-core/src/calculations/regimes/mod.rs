//! The six regime calculators.
//!
//! Each concrete parameter struct knows how to turn itself, together with the
//! shared [`TaxCalculationBase`], into the matching aggregate variant. There is
//! exactly one calculator per parameter type, so a calculator can never be
//! handed the parameters of another regime.
//!
//! | Parameters | Aggregate | Module |
//! |------------|-----------|--------|
//! | `IndividualUsnIncomeParameters` | `IndividualUsnIncomeAggregate` | [`usn_income`] |
//! | `OrganizationUsnIncomeParameters` | `OrganizationUsnIncomeAggregate` | [`usn_income`] |
//! | `IndividualUsnIncomeExpenseParameters` | `IndividualUsnIncomeExpenseAggregate` | [`usn_income_expense`] |
//! | `OrganizationUsnIncomeExpenseParameters` | `OrganizationUsnIncomeExpenseAggregate` | [`usn_income_expense`] |
//! | `IndividualOsnParameters` | `IndividualOsnAggregate` | [`osn`] |
//! | `OrganizationOsnParameters` | `OrganizationOsnAggregate` | [`osn`] |

pub mod osn;
pub mod usn_income;
pub mod usn_income_expense;

use tracing::warn;

use super::base::TaxCalculationBase;
use super::primitives::final_total;
use crate::models::{
    AggregateSummary, IndividualContributions, Money, SelfInsuranceFee, TaxAggregate,
    TaxParameters, TaxParams,
};

/// A parameter set that has its own calculator.
pub trait RegimeCalculation: TaxParams {
    type Aggregate;

    /// Combines these parameters with a precomputed base.
    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate;

    /// Computes the base and runs the calculator.
    fn calculate(&self) -> Self::Aggregate {
        let base = TaxCalculationBase::compute(self);
        self.calculate_with_base(&base)
    }
}

impl TaxParameters {
    /// Runs the calculator matching the parameter variant.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use rutax_core::{
    ///     CommonTaxParameters, CustomerTaxParameters, InsuranceFeeParameters, Money,
    ///     OrganizationUsnIncomeParameters, Rate, TaxParameters,
    /// };
    ///
    /// let customer = CustomerTaxParameters::new(
    ///     Money::new(dec!(1000000)),
    ///     Money::ZERO,
    ///     Money::ZERO,
    /// ).unwrap();
    /// let insurance = InsuranceFeeParameters {
    ///     pension_rate: Rate::ZERO,
    ///     health_rate: Rate::ZERO,
    ///     social_rate: Rate::ZERO,
    ///     additional_contribution_rate: Rate::ZERO,
    ///     free_income_boundary: Money::ZERO,
    /// };
    /// let ndfl = Rate::new(dec!(0.13)).unwrap();
    /// let common = CommonTaxParameters::new(customer, insurance, ndfl).unwrap();
    ///
    /// let params = TaxParameters::OrganizationUsnIncome(OrganizationUsnIncomeParameters {
    ///     common,
    ///     usn_rate: Rate::new(dec!(0.06)).unwrap(),
    /// });
    /// let aggregate = params.calculate();
    ///
    /// assert_eq!(aggregate.total(), Money::new(dec!(60000)));
    /// assert_eq!(aggregate.tax_burden(), dec!(6.00));
    /// ```
    pub fn calculate(&self) -> TaxAggregate {
        match self {
            Self::IndividualUsnIncome(p) => TaxAggregate::IndividualUsnIncome(p.calculate()),
            Self::IndividualUsnIncomeExpense(p) => {
                TaxAggregate::IndividualUsnIncomeExpense(p.calculate())
            }
            Self::IndividualOsn(p) => TaxAggregate::IndividualOsn(p.calculate()),
            Self::OrganizationUsnIncome(p) => TaxAggregate::OrganizationUsnIncome(p.calculate()),
            Self::OrganizationUsnIncomeExpense(p) => {
                TaxAggregate::OrganizationUsnIncomeExpense(p.calculate())
            }
            Self::OrganizationOsn(p) => TaxAggregate::OrganizationOsn(p.calculate()),
        }
    }
}

/// Final step shared by every calculator: totals the tax with the fees.
fn summarize<P: TaxParams + ?Sized>(
    params: &P,
    base: &TaxCalculationBase,
    total_tax: Money,
) -> AggregateSummary {
    let result = final_total(total_tax, base.total_fee, params);

    if result.burden > rust_decimal::Decimal::ONE_HUNDRED {
        warn!(
            entity = %params.entity_type(),
            regime = %params.regime(),
            burden = %result.burden,
            "tax burden exceeds income"
        );
    }

    AggregateSummary {
        employee_fee: base.employee_fee,
        employee_ndfl: base.employee_ndfl,
        insurance_contributions: base.total_fee,
        total: result.total,
        tax_burden: result.burden,
    }
}

fn individual_contributions(
    self_insurance_fee: SelfInsuranceFee,
    base: &TaxCalculationBase,
) -> IndividualContributions {
    IndividualContributions {
        self_insurance_fee,
        additional_fee: base.additional_fee,
    }
}
