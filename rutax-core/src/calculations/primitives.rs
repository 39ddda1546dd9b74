//! Shared formulas the regime calculators are composed from.
//!
//! All arithmetic runs at full decimal precision. Rounding to kopecks happens
//! only in [`employee_ndfl`], in the personal income tax of the individual
//! OSN calculator and in the burden percentage of [`final_total`].
//!
//! | Formula | Definition |
//! |---------|------------|
//! | gross salary | `salary / (1 - ndfl)` |
//! | employee fee | gross salary × pension, health, social rates |
//! | employee NDFL | `round(ndfl × gross salary)` |
//! | additional fee | `max(0, income - boundary) × rate` (individuals only) |
//! | total fee | employee fee + additional fee + own contribution (individuals) |
//! | VAT split | `k = nds / (1 + nds)`; sales `k × income`, purchase `k × expense` |
//! | deduction | `min(total fee, cap × charged tax)`, cap 50% with payroll else 100% |
//! | expense base | employee fee + expense + salary + additional fee |
//! | final total | `max(tax + fee, 0)`, burden `round(total / income × 100)` |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::base::TaxCalculationBase;
use super::common::percentage_of;
use crate::models::{
    EmployeeInsuranceFee, EntityType, Money, OsnParams, Rate, SelfInsuranceFee, TaxParams,
    UsnIncomeExpenseParams, UsnIncomeParams,
};

/// VAT extracted from VAT-inclusive income and expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatSplit {
    /// VAT contained in sales.
    pub sales: Money,
    /// VAT contained in purchases, recoverable against sales VAT.
    pub purchase: Money,
    /// `sales - purchase`; negative when purchases dominate.
    pub net: Money,
}

/// Final liability and its share of income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalTotal {
    pub total: Money,
    /// Percentage of income, rounded to two places, zero without income.
    pub burden: Decimal,
}

/// USN tax charged on gross income: `usn_rate × income`.
pub fn charged_tax_usn_income<P: UsnIncomeParams + ?Sized>(params: &P) -> Money {
    params.usn_rate() * params.income()
}

/// USN tax charged on income less `expense`. Negative when expenses exceed
/// income; callers apply the minimum-tax floor.
pub fn charged_tax_usn_income_expense<P: UsnIncomeExpenseParams + ?Sized>(
    params: &P,
    expense: Money,
) -> Money {
    params.usn_rate() * (params.income() - expense)
}

/// Extracts the VAT already contained in reported income and expense.
pub fn split_vat<P: OsnParams + ?Sized>(params: &P) -> VatSplit {
    let coefficient = params.nds_rate().vat_extraction_coefficient();
    let customer = params.customer();

    let sales = coefficient * customer.income();
    let purchase = coefficient * customer.expense();

    VatSplit {
        sales,
        purchase,
        net: sales - purchase,
    }
}

/// Entrepreneur's additional contribution on income above the free boundary.
/// Always zero for organizations.
pub fn additional_insurance_fee<P: TaxParams + ?Sized>(params: &P) -> Money {
    match params.entity_type() {
        EntityType::Individual => {
            let insurance = params.insurance();
            let excess = params.income() - insurance.free_income_boundary;
            if excess.is_positive() {
                insurance.additional_contribution_rate * excess
            } else {
                Money::ZERO
            }
        }
        EntityType::Organization => Money::ZERO,
    }
}

/// Reported salary is net of withholding; this restores the gross payroll.
fn gross_salary<P: TaxParams + ?Sized>(params: &P) -> Money {
    let net = params.customer().salary();
    let retained = params.ndfl_rate().complement();

    Money::new(net.amount() / retained.value())
}

/// Insurance contributions on the grossed-up payroll.
pub fn employee_insurance_fee<P: TaxParams + ?Sized>(params: &P) -> EmployeeInsuranceFee {
    let gross = gross_salary(params);
    let insurance = params.insurance();

    EmployeeInsuranceFee::new(
        insurance.pension_rate * gross,
        insurance.health_rate * gross,
        insurance.social_rate * gross,
    )
}

/// Income tax withheld from the grossed-up payroll, rounded to kopecks.
pub fn employee_ndfl<P: TaxParams + ?Sized>(params: &P) -> Money {
    (params.ndfl_rate() * gross_salary(params)).round()
}

/// All insurance contributions owed. `self_fee` counts only for individuals.
pub fn total_fee<P: TaxParams + ?Sized>(
    employee_fee: &EmployeeInsuranceFee,
    additional_fee: Money,
    self_fee: &SelfInsuranceFee,
    params: &P,
) -> Money {
    let fees = employee_fee.total() + additional_fee;

    match params.entity_type() {
        EntityType::Individual => fees + self_fee.total(),
        EntityType::Organization => fees,
    }
}

/// Insurance contributions deductible from a USN-Income charge.
///
/// With payroll the deduction may cover at most half of the charged tax;
/// without it, the whole charge.
pub fn tax_deduction<P: TaxParams + ?Sized>(
    params: &P,
    base: &TaxCalculationBase,
    charged_tax: Money,
) -> Money {
    let cap = if params.customer().has_employees() {
        Rate::HALF
    } else {
        Rate::ONE
    };

    base.total_fee.min(cap * charged_tax)
}

/// Deductible expenses shared by the income-expense and general regimes.
/// Excludes VAT and the entrepreneur's own contribution.
pub fn total_expense_base<P: TaxParams + ?Sized>(
    params: &P,
    base: &TaxCalculationBase,
) -> Money {
    let customer = params.customer();

    base.employee_fee.total() + customer.expense() + customer.salary() + base.additional_fee
}

/// Combines tax and fees into the final liability and burden.
///
/// A negative sum is clamped to zero here and nowhere earlier.
pub fn final_total<P: TaxParams + ?Sized>(
    total_tax: Money,
    total_fee: Money,
    params: &P,
) -> FinalTotal {
    let total = (total_tax + total_fee).max(Money::ZERO);
    let burden = percentage_of(total.amount(), params.income().amount());

    FinalTotal { total, burden }
}
