//! Regime-independent quantities computed before any regime formula runs.

use serde::{Deserialize, Serialize};

use super::primitives::{additional_insurance_fee, employee_insurance_fee, employee_ndfl, total_fee};
use crate::models::{EmployeeInsuranceFee, Money, SelfInsuranceFee, TaxParams};

/// Payroll and contribution figures shared by all six calculators.
///
/// Built fresh for every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationBase {
    pub employee_fee: EmployeeInsuranceFee,
    pub employee_ndfl: Money,
    /// Zero for organizations.
    pub additional_fee: Money,
    /// Employee fee, additional fee and, for individuals, the own contribution.
    pub total_fee: Money,
}

impl TaxCalculationBase {
    /// Computes the shared figures from any parameter set.
    ///
    /// Parameter sets without an own contribution count it as zero.
    pub fn compute<P: TaxParams + ?Sized>(params: &P) -> Self {
        let employee_fee = employee_insurance_fee(params);
        let employee_ndfl = employee_ndfl(params);
        let additional_fee = additional_insurance_fee(params);

        let no_self_fee = SelfInsuranceFee::default();
        let self_fee = params.self_insurance_fee().unwrap_or(&no_self_fee);
        let total_fee = total_fee(&employee_fee, additional_fee, self_fee, params);

        Self {
            employee_fee,
            employee_ndfl,
            additional_fee,
            total_fee,
        }
    }
}
