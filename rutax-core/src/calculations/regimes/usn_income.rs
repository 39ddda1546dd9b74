//! Simplified system taxed on gross income.
//!
//! The charged tax is `usn_rate × income`. Insurance contributions are then
//! deducted from it: fully without payroll, up to half of the charge with it.

use super::{RegimeCalculation, individual_contributions, summarize};
use crate::calculations::base::TaxCalculationBase;
use crate::calculations::primitives::{charged_tax_usn_income, tax_deduction};
use crate::models::{
    IndividualUsnIncomeAggregate, IndividualUsnIncomeParameters, Money,
    OrganizationUsnIncomeAggregate, OrganizationUsnIncomeParameters, UsnIncomeParams,
};

struct UsnIncomeTax {
    charged: Money,
    deduction: Money,
    tax: Money,
}

fn usn_income_tax<P: UsnIncomeParams + ?Sized>(
    params: &P,
    base: &TaxCalculationBase,
) -> UsnIncomeTax {
    let charged = charged_tax_usn_income(params);
    let deduction = tax_deduction(params, base, charged);

    UsnIncomeTax {
        charged,
        deduction,
        tax: charged - deduction,
    }
}

impl RegimeCalculation for IndividualUsnIncomeParameters {
    type Aggregate = IndividualUsnIncomeAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        let usn = usn_income_tax(self, base);

        IndividualUsnIncomeAggregate {
            summary: summarize(self, base, usn.tax),
            contributions: individual_contributions(self.self_insurance_fee, base),
            charged_tax: usn.charged,
            deduction: usn.deduction,
            usn_tax: usn.tax,
        }
    }
}

impl RegimeCalculation for OrganizationUsnIncomeParameters {
    type Aggregate = OrganizationUsnIncomeAggregate;

    fn calculate_with_base(
        &self,
        base: &TaxCalculationBase,
    ) -> Self::Aggregate {
        let usn = usn_income_tax(self, base);

        OrganizationUsnIncomeAggregate {
            summary: summarize(self, base, usn.tax),
            charged_tax: usn.charged,
            deduction: usn.deduction,
            usn_tax: usn.tax,
        }
    }
}
