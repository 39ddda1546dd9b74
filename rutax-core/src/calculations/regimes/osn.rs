//! General taxation system: VAT plus an income tax on profit.
//!
//! Reported income and expense include VAT. The VAT part is extracted with
//! [`split_vat`] and removed from both sides before profit is taxed:
//! individuals pay personal income tax, organizations pay profit tax.

use super::{RegimeCalculation, individual_contributions, summarize};
use crate::calculations::base::TaxCalculationBase;
use crate::calculations::primitives::{split_vat, total_expense_base};
use crate::models::{
    IndividualOsnAggregate, IndividualOsnParameters, Money, OrganizationOsnAggregate,
    OrganizationOsnParameters, TaxParams,
};

impl RegimeCalculation for IndividualOsnParameters {
    type Aggregate = IndividualOsnAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        let vat = split_vat(self);

        let expense =
            total_expense_base(self, base) - vat.purchase + self.self_insurance_fee.total();
        let profit = self.income() - vat.sales - expense;
        let pit = (self.ndfl_rate() * profit.max(Money::ZERO)).round();

        IndividualOsnAggregate {
            summary: summarize(self, base, pit + vat.net),
            contributions: individual_contributions(self.self_insurance_fee, base),
            pit,
            vat: vat.net,
        }
    }
}

impl RegimeCalculation for OrganizationOsnParameters {
    type Aggregate = OrganizationOsnAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        let vat = split_vat(self);

        let taxable_income = self.income() - vat.sales;
        let taxable_expense = total_expense_base(self, base) - vat.purchase;
        let profit_tax = self.profit_tax_rate * (taxable_income - taxable_expense).max(Money::ZERO);
        let tax = (profit_tax + vat.net).max(Money::ZERO);

        OrganizationOsnAggregate {
            summary: summarize(self, base, tax),
            profit_tax,
            vat: vat.net,
        }
    }
}
