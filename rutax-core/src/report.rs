//! Flat, serializable views of calculation results for presentation.
//!
//! [`TaxReportDetails`] flattens any [`TaxAggregate`] into one record whose
//! regime-specific fields are optional. It is also the one place where an
//! implausible burden is hidden: a burden above 100% is reported as `None`,
//! while the aggregate keeps the raw value.
//!
//! [`TaxComparison`] runs the same customer figures through all three
//! regimes for one entity type, so they can be shown side by side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxCalculationError;
use crate::fetch::{TaxAmountFetcher, TaxCalculatorFactory, TaxRateFetcher};
use crate::models::{CustomerTaxParameters, EntityType, Money, TaxAggregate, TaxRegime};

/// One regime's result, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReportDetails {
    /// Short regime code, `USN6`, `USN15` or `OSN`.
    pub tax_system: String,
    pub is_legal_entity: bool,

    pub pension_insurance_employees: Money,
    pub health_insurance_employees: Money,
    pub social_insurance_employees: Money,
    pub insurance_contributions: Money,
    pub total: Money,
    /// `None` when the burden exceeds 100%.
    pub tax_burden: Option<Decimal>,

    pub pension_insurance_oneself: Option<Money>,
    pub health_insurance_oneself: Option<Money>,
    pub additional_insurance_fee: Option<Money>,
    pub usn_tax: Option<Money>,
    pub charged_usn_tax: Option<Money>,
    pub insurance_contributions_deduction: Option<Money>,
    pub taxable_expenses: Option<Money>,
    pub pit: Option<Money>,
    pub vat: Option<Money>,
    pub profit_tax: Option<Money>,
}

impl From<&TaxAggregate> for TaxReportDetails {
    fn from(aggregate: &TaxAggregate) -> Self {
        let employee_fee = aggregate.employee_fee();
        let self_fee = aggregate.self_insurance_fee();
        let burden = aggregate.tax_burden();

        Self {
            tax_system: aggregate.regime().as_str().to_string(),
            is_legal_entity: aggregate.entity_type().is_legal_entity(),
            pension_insurance_employees: employee_fee.pension,
            health_insurance_employees: employee_fee.health,
            social_insurance_employees: employee_fee.social,
            insurance_contributions: aggregate.insurance_contributions(),
            total: aggregate.total(),
            tax_burden: (burden <= Decimal::ONE_HUNDRED).then_some(burden),
            pension_insurance_oneself: self_fee.map(|fee| fee.pension),
            health_insurance_oneself: self_fee.map(|fee| fee.health),
            additional_insurance_fee: aggregate.additional_fee(),
            usn_tax: aggregate.usn_tax(),
            charged_usn_tax: aggregate.charged_tax(),
            insurance_contributions_deduction: aggregate.deduction(),
            taxable_expenses: aggregate.taxable_expenses(),
            pit: aggregate.pit(),
            vat: aggregate.vat(),
            profit_tax: aggregate.profit_tax(),
        }
    }
}

impl From<TaxAggregate> for TaxReportDetails {
    fn from(aggregate: TaxAggregate) -> Self {
        Self::from(&aggregate)
    }
}

/// The same figures under every regime available to an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    /// The regime the customer currently uses.
    pub current_tax_system: String,
    pub is_legal_entity: bool,
    pub osn: TaxReportDetails,
    pub usn_income_expense: TaxReportDetails,
    pub usn_income: TaxReportDetails,
}

impl TaxComparison {
    /// Builds one calculator per regime for `year` and runs `customer`
    /// through each.
    ///
    /// # Errors
    ///
    /// The first build failure, as
    /// [`TaxCalculatorFactory::build_calculator`].
    pub fn calculate<R, A>(
        factory: &TaxCalculatorFactory<R, A>,
        entity_type: EntityType,
        current_regime: TaxRegime,
        year: i32,
        customer: CustomerTaxParameters,
    ) -> Result<Self, TaxCalculationError>
    where
        R: TaxRateFetcher,
        A: TaxAmountFetcher,
    {
        let details = |regime: TaxRegime| -> Result<TaxReportDetails, TaxCalculationError> {
            let aggregate = factory
                .build_calculator(entity_type, regime, year)?
                .calculate(customer);
            Ok(TaxReportDetails::from(&aggregate))
        };

        Ok(Self {
            current_tax_system: current_regime.as_str().to_string(),
            is_legal_entity: entity_type.is_legal_entity(),
            osn: details(TaxRegime::Osn)?,
            usn_income_expense: details(TaxRegime::UsnIncomeExpense)?,
            usn_income: details(TaxRegime::UsnIncome)?,
        })
    }

    /// The regime with the lowest total; ties go to the current regime,
    /// then to the simpler one.
    pub fn cheapest(&self) -> &TaxReportDetails {
        let mut candidates = [&self.usn_income, &self.usn_income_expense, &self.osn];
        candidates.sort_by_key(|details| {
            (details.total, details.tax_system != self.current_tax_system)
        });
        candidates[0]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        AggregateSummary, EmployeeInsuranceFee, IndividualContributions, IndividualOsnAggregate,
        OrganizationUsnIncomeExpenseAggregate, SelfInsuranceFee,
    };

    fn money(value: Decimal) -> Money {
        Money::new(value)
    }

    fn summary(tax_burden: Decimal) -> AggregateSummary {
        AggregateSummary {
            employee_fee: EmployeeInsuranceFee::new(
                money(dec!(22000)),
                money(dec!(5100)),
                money(dec!(2900)),
            ),
            employee_ndfl: money(dec!(13000)),
            insurance_contributions: money(dec!(30000)),
            total: money(dec!(102450)),
            tax_burden,
        }
    }

    fn details(
        tax_system: &str,
        total: Decimal,
    ) -> TaxReportDetails {
        TaxReportDetails::from(&TaxAggregate::OrganizationUsnIncomeExpense(
            OrganizationUsnIncomeExpenseAggregate {
                summary: AggregateSummary {
                    total: money(total),
                    ..summary(dec!(1))
                },
                taxable_expenses: Money::ZERO,
                usn_tax: Money::ZERO,
            },
        ))
        .with_tax_system(tax_system)
    }

    impl TaxReportDetails {
        fn with_tax_system(
            mut self,
            tax_system: &str,
        ) -> Self {
            self.tax_system = tax_system.to_string();
            self
        }
    }

    // =========================================================================
    // TaxReportDetails tests
    // =========================================================================

    #[test]
    fn organization_details_leave_individual_fields_empty() {
        let aggregate =
            TaxAggregate::OrganizationUsnIncomeExpense(OrganizationUsnIncomeExpenseAggregate {
                summary: summary(dec!(10.25)),
                taxable_expenses: money(dec!(517000)),
                usn_tax: money(dec!(72450)),
            });

        let report = TaxReportDetails::from(&aggregate);

        assert_eq!(
            report,
            TaxReportDetails {
                tax_system: "USN15".to_string(),
                is_legal_entity: true,
                pension_insurance_employees: money(dec!(22000)),
                health_insurance_employees: money(dec!(5100)),
                social_insurance_employees: money(dec!(2900)),
                insurance_contributions: money(dec!(30000)),
                total: money(dec!(102450)),
                tax_burden: Some(dec!(10.25)),
                pension_insurance_oneself: None,
                health_insurance_oneself: None,
                additional_insurance_fee: None,
                usn_tax: Some(money(dec!(72450))),
                charged_usn_tax: None,
                insurance_contributions_deduction: None,
                taxable_expenses: Some(money(dec!(517000))),
                pit: None,
                vat: None,
                profit_tax: None,
            }
        );
    }

    #[test]
    fn individual_details_carry_own_contributions() {
        let aggregate = TaxAggregate::IndividualOsn(IndividualOsnAggregate {
            summary: summary(dec!(16.65)),
            contributions: IndividualContributions {
                self_insurance_fee: SelfInsuranceFee::new(money(dec!(32000)), money(dec!(8000))),
                additional_fee: money(dec!(9000)),
            },
            pit: money(dec!(59800)),
            vat: money(dec!(100000)),
        });

        let report = TaxReportDetails::from(aggregate);

        assert_eq!(report.tax_system, "OSN");
        assert!(!report.is_legal_entity);
        assert_eq!(report.pension_insurance_oneself, Some(money(dec!(32000))));
        assert_eq!(report.health_insurance_oneself, Some(money(dec!(8000))));
        assert_eq!(report.additional_insurance_fee, Some(money(dec!(9000))));
        assert_eq!(report.pit, Some(money(dec!(59800))));
        assert_eq!(report.vat, Some(money(dec!(100000))));
        assert_eq!(report.usn_tax, None);
    }

    #[test]
    fn burden_of_exactly_hundred_is_reported() {
        let aggregate =
            TaxAggregate::OrganizationUsnIncomeExpense(OrganizationUsnIncomeExpenseAggregate {
                summary: summary(dec!(100.00)),
                taxable_expenses: Money::ZERO,
                usn_tax: Money::ZERO,
            });

        assert_eq!(TaxReportDetails::from(&aggregate).tax_burden, Some(dec!(100.00)));
    }

    #[test]
    fn burden_above_hundred_is_hidden_but_kept_in_aggregate() {
        let aggregate =
            TaxAggregate::OrganizationUsnIncomeExpense(OrganizationUsnIncomeExpenseAggregate {
                summary: summary(dec!(201.00)),
                taxable_expenses: Money::ZERO,
                usn_tax: Money::ZERO,
            });

        let report = TaxReportDetails::from(&aggregate);

        assert_eq!(report.tax_burden, None);
        assert_eq!(aggregate.tax_burden(), dec!(201.00));
    }

    // =========================================================================
    // TaxComparison::cheapest tests
    // =========================================================================

    fn comparison(
        current: &str,
        usn_income: Decimal,
        usn_income_expense: Decimal,
        osn: Decimal,
    ) -> TaxComparison {
        TaxComparison {
            current_tax_system: current.to_string(),
            is_legal_entity: true,
            osn: details("OSN", osn),
            usn_income_expense: details("USN15", usn_income_expense),
            usn_income: details("USN6", usn_income),
        }
    }

    #[test]
    fn cheapest_picks_lowest_total() {
        let comparison = comparison("USN6", dec!(60000), dec!(45000), dec!(90000));

        assert_eq!(comparison.cheapest().tax_system, "USN15");
    }

    #[test]
    fn cheapest_prefers_current_regime_on_tie() {
        let comparison = comparison("OSN", dec!(60000), dec!(90000), dec!(60000));

        assert_eq!(comparison.cheapest().tax_system, "OSN");
    }

    #[test]
    fn cheapest_prefers_simpler_regime_on_tie() {
        let comparison = comparison("OSN", dec!(60000), dec!(60000), dec!(90000));

        assert_eq!(comparison.cheapest().tax_system, "USN6");
    }
}
