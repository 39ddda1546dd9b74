//! Simplified system taxed on income minus expenses.
//!
//! The tax is `usn_rate × (income - expense base)` but never less than the
//! minimum tax `min_tax_rate × income`. The comparison runs at full precision;
//! the charge may be negative before the floor lifts it.

use super::{RegimeCalculation, individual_contributions, summarize};
use crate::calculations::base::TaxCalculationBase;
use crate::calculations::primitives::{charged_tax_usn_income_expense, total_expense_base};
use crate::models::{
    IndividualUsnIncomeExpenseAggregate, IndividualUsnIncomeExpenseParameters, Money,
    OrganizationUsnIncomeExpenseAggregate, OrganizationUsnIncomeExpenseParameters,
    UsnIncomeExpenseParams,
};

/// Applies the minimum-tax floor to the charge on `expense_base`.
fn floored_tax<P: UsnIncomeExpenseParams + ?Sized>(
    params: &P,
    expense_base: Money,
) -> Money {
    let charged = charged_tax_usn_income_expense(params, expense_base);
    let minimum = params.min_tax_rate() * params.income();

    charged.max(minimum)
}

impl RegimeCalculation for IndividualUsnIncomeExpenseParameters {
    type Aggregate = IndividualUsnIncomeExpenseAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        // The entrepreneur's own contribution is an accepted expense.
        let expense_base = total_expense_base(self, base) + self.self_insurance_fee.total();
        let tax = floored_tax(self, expense_base);

        IndividualUsnIncomeExpenseAggregate {
            summary: summarize(self, base, tax),
            contributions: individual_contributions(self.self_insurance_fee, base),
            taxable_expenses: expense_base,
            usn_tax: tax,
        }
    }
}

impl RegimeCalculation for OrganizationUsnIncomeExpenseParameters {
    type Aggregate = OrganizationUsnIncomeExpenseAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        let expense_base = total_expense_base(self, base);
        let tax = floored_tax(self, expense_base);

        OrganizationUsnIncomeExpenseAggregate {
            summary: summarize(self, base, tax),
            taxable_expenses: expense_base,
            usn_tax: tax,
        }
    }
}
