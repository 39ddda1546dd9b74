//! Parameter builders shared by the calculation unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    CommonTaxParameters, CustomerTaxParameters, InsuranceFeeParameters, Money, Rate,
    SelfInsuranceFee,
};

pub(crate) fn rate(value: Decimal) -> Rate {
    Rate::new(value).unwrap()
}

pub(crate) fn money(value: Decimal) -> Money {
    Money::new(value)
}

pub(crate) fn customer(
    income: Decimal,
    expense: Decimal,
    salary: Decimal,
) -> CustomerTaxParameters {
    CustomerTaxParameters::new(money(income), money(expense), money(salary)).unwrap()
}

/// Payroll rates 22% / 5.1% / 2.9%, 1% above 300 000.
pub(crate) fn insurance_2024() -> InsuranceFeeParameters {
    InsuranceFeeParameters {
        pension_rate: rate(dec!(0.22)),
        health_rate: rate(dec!(0.051)),
        social_rate: rate(dec!(0.029)),
        additional_contribution_rate: rate(dec!(0.01)),
        free_income_boundary: money(dec!(300000)),
    }
}

/// Every insurance rate fetched as zero.
pub(crate) fn no_insurance() -> InsuranceFeeParameters {
    InsuranceFeeParameters {
        pension_rate: Rate::ZERO,
        health_rate: Rate::ZERO,
        social_rate: Rate::ZERO,
        additional_contribution_rate: Rate::ZERO,
        free_income_boundary: Money::ZERO,
    }
}

/// Common parameters with 13% withholding.
pub(crate) fn common(
    customer: CustomerTaxParameters,
    insurance: InsuranceFeeParameters,
) -> CommonTaxParameters {
    CommonTaxParameters::new(customer, insurance, rate(dec!(0.13))).unwrap()
}

/// Own contribution of 40 000.
pub(crate) fn self_fee() -> SelfInsuranceFee {
    self_fee_of(dec!(32000), dec!(8000))
}

pub(crate) fn self_fee_of(
    pension: Decimal,
    health: Decimal,
) -> SelfInsuranceFee {
    SelfInsuranceFee::new(money(pension), money(health))
}
