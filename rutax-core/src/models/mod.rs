mod aggregate;
mod entity;
mod insurance;
mod money;
mod parameters;

pub use aggregate::{
    AggregateSummary, IndividualContributions, IndividualOsnAggregate,
    IndividualUsnIncomeAggregate, IndividualUsnIncomeExpenseAggregate, OrganizationOsnAggregate,
    OrganizationUsnIncomeAggregate, OrganizationUsnIncomeExpenseAggregate, TaxAggregate,
};
pub use entity::{EntityType, TaxRegime};
pub use insurance::{EmployeeInsuranceFee, InsuranceFeeParameters, SelfInsuranceFee};
pub use money::{Money, Rate, RateError};
pub use parameters::{
    CommonTaxParameters, CustomerTaxParameters, IndividualOsnParameters,
    IndividualUsnIncomeExpenseParameters, IndividualUsnIncomeParameters, MAX_REPORTED_AMOUNT,
    MAX_WITHHOLDING_RATE, OrganizationOsnParameters, OrganizationUsnIncomeExpenseParameters,
    OrganizationUsnIncomeParameters, OsnParams, TaxParameters, TaxParams, UsnIncomeExpenseParams,
    UsnIncomeParams,
};

pub(crate) use parameters::ensure_withholding_rate;
