//! Result records produced by the regime calculators.
//!
//! | Variant | Regime-specific fields |
//! |---------|------------------------|
//! | [`IndividualUsnIncomeAggregate`] | USN tax, charged tax, fee deduction, own contributions |
//! | [`IndividualUsnIncomeExpenseAggregate`] | USN tax, taxable expenses, own contributions |
//! | [`IndividualOsnAggregate`] | personal income tax, VAT, own contributions |
//! | [`OrganizationUsnIncomeAggregate`] | USN tax, charged tax, fee deduction |
//! | [`OrganizationUsnIncomeExpenseAggregate`] | USN tax, taxable expenses |
//! | [`OrganizationOsnAggregate`] | profit tax, VAT |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::{EntityType, TaxRegime};
use super::insurance::{EmployeeInsuranceFee, SelfInsuranceFee};
use super::money::Money;

/// Fields every aggregate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub employee_fee: EmployeeInsuranceFee,
    /// Income tax withheld from employee payroll.
    pub employee_ndfl: Money,
    /// All insurance contributions paid, including the entrepreneur's own.
    pub insurance_contributions: Money,
    /// Final liability, never negative.
    pub total: Money,
    /// Total as a percentage of income. Not clamped; may exceed 100.
    pub tax_burden: Decimal,
}

/// Contributions only an individual entrepreneur owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualContributions {
    pub self_insurance_fee: SelfInsuranceFee,
    /// Additional contribution on income above the free boundary.
    pub additional_fee: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualUsnIncomeAggregate {
    pub summary: AggregateSummary,
    pub contributions: IndividualContributions,
    /// Tax before the insurance deduction.
    pub charged_tax: Money,
    /// Insurance contributions deducted from the charged tax.
    pub deduction: Money,
    pub usn_tax: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualUsnIncomeExpenseAggregate {
    pub summary: AggregateSummary,
    pub contributions: IndividualContributions,
    /// Expenses accepted against income.
    pub taxable_expenses: Money,
    /// USN tax after the minimum-tax floor.
    pub usn_tax: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualOsnAggregate {
    pub summary: AggregateSummary,
    pub contributions: IndividualContributions,
    /// Personal income tax on business profit.
    pub pit: Money,
    /// Net VAT payable; negative when purchase VAT exceeds sales VAT.
    pub vat: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationUsnIncomeAggregate {
    pub summary: AggregateSummary,
    pub charged_tax: Money,
    pub deduction: Money,
    pub usn_tax: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationUsnIncomeExpenseAggregate {
    pub summary: AggregateSummary,
    pub taxable_expenses: Money,
    pub usn_tax: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationOsnAggregate {
    pub summary: AggregateSummary,
    pub profit_tax: Money,
    /// Net VAT payable; negative when purchase VAT exceeds sales VAT.
    pub vat: Money,
}

/// The outcome of one calculation, tagged by entity type and regime.
///
/// Accessors return `None` for fields the regime does not have, so callers
/// can read any field without matching on the variant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TaxAggregate {
    IndividualUsnIncome(IndividualUsnIncomeAggregate),
    IndividualUsnIncomeExpense(IndividualUsnIncomeExpenseAggregate),
    IndividualOsn(IndividualOsnAggregate),
    OrganizationUsnIncome(OrganizationUsnIncomeAggregate),
    OrganizationUsnIncomeExpense(OrganizationUsnIncomeExpenseAggregate),
    OrganizationOsn(OrganizationOsnAggregate),
}

impl TaxAggregate {
    pub fn summary(&self) -> &AggregateSummary {
        match self {
            Self::IndividualUsnIncome(a) => &a.summary,
            Self::IndividualUsnIncomeExpense(a) => &a.summary,
            Self::IndividualOsn(a) => &a.summary,
            Self::OrganizationUsnIncome(a) => &a.summary,
            Self::OrganizationUsnIncomeExpense(a) => &a.summary,
            Self::OrganizationOsn(a) => &a.summary,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::IndividualUsnIncome(_)
            | Self::IndividualUsnIncomeExpense(_)
            | Self::IndividualOsn(_) => EntityType::Individual,
            Self::OrganizationUsnIncome(_)
            | Self::OrganizationUsnIncomeExpense(_)
            | Self::OrganizationOsn(_) => EntityType::Organization,
        }
    }

    pub fn regime(&self) -> TaxRegime {
        match self {
            Self::IndividualUsnIncome(_) | Self::OrganizationUsnIncome(_) => TaxRegime::UsnIncome,
            Self::IndividualUsnIncomeExpense(_) | Self::OrganizationUsnIncomeExpense(_) => {
                TaxRegime::UsnIncomeExpense
            }
            Self::IndividualOsn(_) | Self::OrganizationOsn(_) => TaxRegime::Osn,
        }
    }

    pub fn employee_fee(&self) -> &EmployeeInsuranceFee {
        &self.summary().employee_fee
    }

    pub fn employee_ndfl(&self) -> Money {
        self.summary().employee_ndfl
    }

    pub fn insurance_contributions(&self) -> Money {
        self.summary().insurance_contributions
    }

    pub fn total(&self) -> Money {
        self.summary().total
    }

    pub fn tax_burden(&self) -> Decimal {
        self.summary().tax_burden
    }

    /// The tax part of the liability, before insurance is added and before
    /// the final clamp at zero.
    pub fn tax_portion(&self) -> Money {
        match self {
            Self::IndividualUsnIncome(a) => a.usn_tax,
            Self::IndividualUsnIncomeExpense(a) => a.usn_tax,
            Self::IndividualOsn(a) => a.pit + a.vat,
            Self::OrganizationUsnIncome(a) => a.usn_tax,
            Self::OrganizationUsnIncomeExpense(a) => a.usn_tax,
            Self::OrganizationOsn(a) => (a.profit_tax + a.vat).max(Money::ZERO),
        }
    }

    pub fn individual_contributions(&self) -> Option<&IndividualContributions> {
        match self {
            Self::IndividualUsnIncome(a) => Some(&a.contributions),
            Self::IndividualUsnIncomeExpense(a) => Some(&a.contributions),
            Self::IndividualOsn(a) => Some(&a.contributions),
            _ => None,
        }
    }

    pub fn self_insurance_fee(&self) -> Option<&SelfInsuranceFee> {
        self.individual_contributions().map(|c| &c.self_insurance_fee)
    }

    pub fn additional_fee(&self) -> Option<Money> {
        self.individual_contributions().map(|c| c.additional_fee)
    }

    pub fn usn_tax(&self) -> Option<Money> {
        match self {
            Self::IndividualUsnIncome(a) => Some(a.usn_tax),
            Self::IndividualUsnIncomeExpense(a) => Some(a.usn_tax),
            Self::OrganizationUsnIncome(a) => Some(a.usn_tax),
            Self::OrganizationUsnIncomeExpense(a) => Some(a.usn_tax),
            _ => None,
        }
    }

    pub fn charged_tax(&self) -> Option<Money> {
        match self {
            Self::IndividualUsnIncome(a) => Some(a.charged_tax),
            Self::OrganizationUsnIncome(a) => Some(a.charged_tax),
            _ => None,
        }
    }

    pub fn deduction(&self) -> Option<Money> {
        match self {
            Self::IndividualUsnIncome(a) => Some(a.deduction),
            Self::OrganizationUsnIncome(a) => Some(a.deduction),
            _ => None,
        }
    }

    pub fn taxable_expenses(&self) -> Option<Money> {
        match self {
            Self::IndividualUsnIncomeExpense(a) => Some(a.taxable_expenses),
            Self::OrganizationUsnIncomeExpense(a) => Some(a.taxable_expenses),
            _ => None,
        }
    }

    pub fn vat(&self) -> Option<Money> {
        match self {
            Self::IndividualOsn(a) => Some(a.vat),
            Self::OrganizationOsn(a) => Some(a.vat),
            _ => None,
        }
    }

    pub fn pit(&self) -> Option<Money> {
        match self {
            Self::IndividualOsn(a) => Some(a.pit),
            _ => None,
        }
    }

    pub fn profit_tax(&self) -> Option<Money> {
        match self {
            Self::OrganizationOsn(a) => Some(a.profit_tax),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn summary(total: Decimal) -> AggregateSummary {
        AggregateSummary {
            employee_fee: EmployeeInsuranceFee::default(),
            employee_ndfl: Money::ZERO,
            insurance_contributions: Money::new(dec!(40000)),
            total: Money::new(total),
            tax_burden: dec!(6.00),
        }
    }

    fn org_osn(profit_tax: Decimal, vat: Decimal) -> TaxAggregate {
        TaxAggregate::OrganizationOsn(OrganizationOsnAggregate {
            summary: summary(dec!(40000)),
            profit_tax: Money::new(profit_tax),
            vat: Money::new(vat),
        })
    }

    #[test]
    fn accessors_expose_variant_fields() {
        let aggregate = TaxAggregate::IndividualUsnIncome(IndividualUsnIncomeAggregate {
            summary: summary(dec!(60000)),
            contributions: IndividualContributions {
                self_insurance_fee: SelfInsuranceFee::new(
                    Money::new(dec!(32000)),
                    Money::new(dec!(8000)),
                ),
                additional_fee: Money::ZERO,
            },
            charged_tax: Money::new(dec!(60000)),
            deduction: Money::new(dec!(40000)),
            usn_tax: Money::new(dec!(20000)),
        });

        assert_eq!(aggregate.entity_type(), EntityType::Individual);
        assert_eq!(aggregate.regime(), TaxRegime::UsnIncome);
        assert_eq!(aggregate.charged_tax(), Some(Money::new(dec!(60000))));
        assert_eq!(aggregate.deduction(), Some(Money::new(dec!(40000))));
        assert_eq!(aggregate.usn_tax(), Some(Money::new(dec!(20000))));
        assert_eq!(aggregate.tax_portion(), Money::new(dec!(20000)));
        assert_eq!(
            aggregate.self_insurance_fee().map(SelfInsuranceFee::total),
            Some(Money::new(dec!(40000)))
        );
        assert_eq!(aggregate.vat(), None);
        assert_eq!(aggregate.profit_tax(), None);
    }

    #[test]
    fn organization_has_no_individual_contributions() {
        let aggregate = org_osn(dec!(1000), dec!(500));

        assert_eq!(aggregate.entity_type(), EntityType::Organization);
        assert_eq!(aggregate.additional_fee(), None);
        assert_eq!(aggregate.self_insurance_fee(), None);
        assert_eq!(aggregate.usn_tax(), None);
    }

    #[test]
    fn organization_osn_tax_portion_is_clamped() {
        let aggregate = org_osn(dec!(0), dec!(-2500));

        assert_eq!(aggregate.tax_portion(), Money::ZERO);
        assert_eq!(aggregate.vat(), Some(Money::new(dec!(-2500))));
    }

    #[test]
    fn equality_covers_variant_and_summary_fields() {
        assert_eq!(org_osn(dec!(1000), dec!(500)), org_osn(dec!(1000), dec!(500)));
        assert!(org_osn(dec!(1000), dec!(500)) != org_osn(dec!(1000), dec!(501)));

        let mut other = org_osn(dec!(1000), dec!(500));
        if let TaxAggregate::OrganizationOsn(a) = &mut other {
            a.summary.tax_burden = dec!(6.01);
        }
        assert!(org_osn(dec!(1000), dec!(500)) != other);
    }
}
