//! Input bundles for the regime calculators.
//!
//! Each (entity type, regime) pair has its own parameter struct carrying
//! exactly the rates that regime needs. The capability traits at the bottom
//! of this module let the shared primitives accept any parameter struct that
//! has the rate they read, so a USN formula can never be handed OSN inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::{EntityType, TaxRegime};
use super::insurance::{InsuranceFeeParameters, SelfInsuranceFee};
use super::money::{Money, Rate};
use crate::error::TaxCalculationError;

/// Largest income, expense or salary accepted: one quadrillion roubles.
pub const MAX_REPORTED_AMOUNT: Money =
    Money::new(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

/// Largest withholding rate accepted. Gross-up multiplies salary by at most
/// `1 / (1 - 0.99) = 100`.
pub const MAX_WITHHOLDING_RATE: Decimal = Decimal::from_parts(99, 0, 0, false, 2);

/// Figures reported by the customer for the period.
///
/// `salary` is payroll paid out to employees, net of income-tax withholding.
/// Every figure is a non-negative whole number of kopecks no larger than
/// [`MAX_REPORTED_AMOUNT`], which keeps the calculators free of overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCustomerTaxParameters")]
pub struct CustomerTaxParameters {
    income: Money,
    expense: Money,
    salary: Money,
}

#[derive(Deserialize)]
struct RawCustomerTaxParameters {
    income: Money,
    expense: Money,
    salary: Money,
}

impl TryFrom<RawCustomerTaxParameters> for CustomerTaxParameters {
    type Error = TaxCalculationError;

    fn try_from(raw: RawCustomerTaxParameters) -> Result<Self, Self::Error> {
        Self::new(raw.income, raw.expense, raw.salary)
    }
}

impl CustomerTaxParameters {
    /// Creates the customer figures.
    ///
    /// # Errors
    ///
    /// Names the first offending field with
    /// [`TaxCalculationError::NegativeInput`],
    /// [`TaxCalculationError::ExcessPrecision`] (finer than a kopeck) or
    /// [`TaxCalculationError::AmountTooLarge`].
    pub fn new(
        income: Money,
        expense: Money,
        salary: Money,
    ) -> Result<Self, TaxCalculationError> {
        for (field, value) in [("income", income), ("expense", expense), ("salary", salary)] {
            ensure_reported_amount(field, value)?;
        }
        Ok(Self {
            income,
            expense,
            salary,
        })
    }

    pub fn income(&self) -> Money {
        self.income
    }

    pub fn expense(&self) -> Money {
        self.expense
    }

    pub fn salary(&self) -> Money {
        self.salary
    }

    /// Whether the customer reports any payroll.
    pub fn has_employees(&self) -> bool {
        self.salary.is_positive()
    }
}

fn ensure_reported_amount(
    field: &'static str,
    value: Money,
) -> Result<(), TaxCalculationError> {
    let amount = value.amount();
    if value.is_negative() {
        return Err(TaxCalculationError::NegativeInput { field, value: amount });
    }
    if amount.normalize().scale() > 2 {
        return Err(TaxCalculationError::ExcessPrecision { field, value: amount });
    }
    if value > MAX_REPORTED_AMOUNT {
        return Err(TaxCalculationError::AmountTooLarge {
            field,
            value: amount,
            limit: MAX_REPORTED_AMOUNT.amount(),
        });
    }
    Ok(())
}

/// Parameters every regime shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CommonTaxParameters {
    customer: CustomerTaxParameters,
    insurance: InsuranceFeeParameters,
    ndfl_rate: Rate,
}

impl CommonTaxParameters {
    /// # Errors
    ///
    /// Returns [`TaxCalculationError::WithholdingRateTooHigh`] if `ndfl_rate`
    /// exceeds [`MAX_WITHHOLDING_RATE`].
    pub fn new(
        customer: CustomerTaxParameters,
        insurance: InsuranceFeeParameters,
        ndfl_rate: Rate,
    ) -> Result<Self, TaxCalculationError> {
        ensure_withholding_rate(ndfl_rate)?;
        Ok(Self::with_checked_rate(customer, insurance, ndfl_rate))
    }

    /// For a rate that already passed [`ensure_withholding_rate`].
    pub(crate) fn with_checked_rate(
        customer: CustomerTaxParameters,
        insurance: InsuranceFeeParameters,
        ndfl_rate: Rate,
    ) -> Self {
        Self {
            customer,
            insurance,
            ndfl_rate,
        }
    }

    pub fn customer(&self) -> &CustomerTaxParameters {
        &self.customer
    }

    pub fn insurance(&self) -> &InsuranceFeeParameters {
        &self.insurance
    }

    /// Personal income-tax withholding rate.
    pub fn ndfl_rate(&self) -> Rate {
        self.ndfl_rate
    }
}

pub(crate) fn ensure_withholding_rate(rate: Rate) -> Result<(), TaxCalculationError> {
    if rate.value() > MAX_WITHHOLDING_RATE {
        return Err(TaxCalculationError::WithholdingRateTooHigh {
            value: rate.value(),
            limit: MAX_WITHHOLDING_RATE,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IndividualUsnIncomeParameters {
    pub common: CommonTaxParameters,
    pub self_insurance_fee: SelfInsuranceFee,
    pub usn_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IndividualUsnIncomeExpenseParameters {
    pub common: CommonTaxParameters,
    pub self_insurance_fee: SelfInsuranceFee,
    pub usn_rate: Rate,
    /// Minimum tax as a share of income.
    pub min_tax_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IndividualOsnParameters {
    pub common: CommonTaxParameters,
    pub self_insurance_fee: SelfInsuranceFee,
    /// VAT rate.
    pub nds_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrganizationUsnIncomeParameters {
    pub common: CommonTaxParameters,
    pub usn_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrganizationUsnIncomeExpenseParameters {
    pub common: CommonTaxParameters,
    pub usn_rate: Rate,
    /// Minimum tax as a share of income.
    pub min_tax_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrganizationOsnParameters {
    pub common: CommonTaxParameters,
    /// VAT rate.
    pub nds_rate: Rate,
    pub profit_tax_rate: Rate,
}

/// Parameters for one calculation, tagged by entity type and regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaxParameters {
    IndividualUsnIncome(IndividualUsnIncomeParameters),
    IndividualUsnIncomeExpense(IndividualUsnIncomeExpenseParameters),
    IndividualOsn(IndividualOsnParameters),
    OrganizationUsnIncome(OrganizationUsnIncomeParameters),
    OrganizationUsnIncomeExpense(OrganizationUsnIncomeExpenseParameters),
    OrganizationOsn(OrganizationOsnParameters),
}

/// Forwards a [`TaxParams`] call to the variant's parameter struct.
macro_rules! each_variant {
    ($params:expr, $p:ident => $body:expr) => {
        match $params {
            TaxParameters::IndividualUsnIncome($p) => $body,
            TaxParameters::IndividualUsnIncomeExpense($p) => $body,
            TaxParameters::IndividualOsn($p) => $body,
            TaxParameters::OrganizationUsnIncome($p) => $body,
            TaxParameters::OrganizationUsnIncomeExpense($p) => $body,
            TaxParameters::OrganizationOsn($p) => $body,
        }
    };
}

impl TaxParams for TaxParameters {
    fn common(&self) -> &CommonTaxParameters {
        each_variant!(self, p => p.common())
    }

    fn entity_type(&self) -> EntityType {
        each_variant!(self, p => p.entity_type())
    }

    fn regime(&self) -> TaxRegime {
        each_variant!(self, p => p.regime())
    }

    fn self_insurance_fee(&self) -> Option<&SelfInsuranceFee> {
        each_variant!(self, p => p.self_insurance_fee())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// capability traits
// ─────────────────────────────────────────────────────────────────────────────

/// Access shared by every parameter struct.
pub trait TaxParams {
    fn common(&self) -> &CommonTaxParameters;

    fn entity_type(&self) -> EntityType;

    fn regime(&self) -> TaxRegime;

    /// The entrepreneur's own contribution; `None` for organizations.
    fn self_insurance_fee(&self) -> Option<&SelfInsuranceFee> {
        None
    }

    fn customer(&self) -> &CustomerTaxParameters {
        self.common().customer()
    }

    fn insurance(&self) -> &InsuranceFeeParameters {
        self.common().insurance()
    }

    fn ndfl_rate(&self) -> Rate {
        self.common().ndfl_rate()
    }

    fn income(&self) -> Money {
        self.customer().income()
    }
}

/// Parameters of a USN regime taxed on gross income.
pub trait UsnIncomeParams: TaxParams {
    fn usn_rate(&self) -> Rate;
}

/// Parameters of a USN regime taxed on income minus expenses.
pub trait UsnIncomeExpenseParams: TaxParams {
    fn usn_rate(&self) -> Rate;

    fn min_tax_rate(&self) -> Rate;
}

/// Parameters of the general regime.
pub trait OsnParams: TaxParams {
    fn nds_rate(&self) -> Rate;
}

macro_rules! impl_tax_params {
    ($ty:ty, $entity:expr, $regime:expr, individual) => {
        impl TaxParams for $ty {
            fn common(&self) -> &CommonTaxParameters {
                &self.common
            }

            fn entity_type(&self) -> EntityType {
                $entity
            }

            fn regime(&self) -> TaxRegime {
                $regime
            }

            fn self_insurance_fee(&self) -> Option<&SelfInsuranceFee> {
                Some(&self.self_insurance_fee)
            }
        }
    };
    ($ty:ty, $entity:expr, $regime:expr) => {
        impl TaxParams for $ty {
            fn common(&self) -> &CommonTaxParameters {
                &self.common
            }

            fn entity_type(&self) -> EntityType {
                $entity
            }

            fn regime(&self) -> TaxRegime {
                $regime
            }
        }
    };
}

impl_tax_params!(
    IndividualUsnIncomeParameters,
    EntityType::Individual,
    TaxRegime::UsnIncome,
    individual
);
impl_tax_params!(
    IndividualUsnIncomeExpenseParameters,
    EntityType::Individual,
    TaxRegime::UsnIncomeExpense,
    individual
);
impl_tax_params!(
    IndividualOsnParameters,
    EntityType::Individual,
    TaxRegime::Osn,
    individual
);
impl_tax_params!(
    OrganizationUsnIncomeParameters,
    EntityType::Organization,
    TaxRegime::UsnIncome
);
impl_tax_params!(
    OrganizationUsnIncomeExpenseParameters,
    EntityType::Organization,
    TaxRegime::UsnIncomeExpense
);
impl_tax_params!(
    OrganizationOsnParameters,
    EntityType::Organization,
    TaxRegime::Osn
);

impl UsnIncomeParams for IndividualUsnIncomeParameters {
    fn usn_rate(&self) -> Rate {
        self.usn_rate
    }
}

impl UsnIncomeParams for OrganizationUsnIncomeParameters {
    fn usn_rate(&self) -> Rate {
        self.usn_rate
    }
}

impl UsnIncomeExpenseParams for IndividualUsnIncomeExpenseParameters {
    fn usn_rate(&self) -> Rate {
        self.usn_rate
    }

    fn min_tax_rate(&self) -> Rate {
        self.min_tax_rate
    }
}

impl UsnIncomeExpenseParams for OrganizationUsnIncomeExpenseParameters {
    fn usn_rate(&self) -> Rate {
        self.usn_rate
    }

    fn min_tax_rate(&self) -> Rate {
        self.min_tax_rate
    }
}

impl OsnParams for IndividualOsnParameters {
    fn nds_rate(&self) -> Rate {
        self.nds_rate
    }
}

impl OsnParams for OrganizationOsnParameters {
    fn nds_rate(&self) -> Rate {
        self.nds_rate
    }
}
