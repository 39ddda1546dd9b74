use serde::{Deserialize, Serialize};

use super::money::{Money, Rate};

/// Insurance contribution rates and limits for a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsuranceFeeParameters {
    /// Pension fund contribution rate on payroll.
    pub pension_rate: Rate,
    /// Mandatory health insurance contribution rate on payroll.
    pub health_rate: Rate,
    /// Social insurance contribution rate on payroll.
    pub social_rate: Rate,
    /// Rate of the entrepreneur's additional contribution on excess income.
    pub additional_contribution_rate: Rate,
    /// Annual income an entrepreneur may earn before the additional
    /// contribution applies.
    pub free_income_boundary: Money,
}

/// Insurance contributions charged on employee payroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeInsuranceFee {
    pub pension: Money,
    pub health: Money,
    pub social: Money,
}

impl EmployeeInsuranceFee {
    pub fn new(
        pension: Money,
        health: Money,
        social: Money,
    ) -> Self {
        Self {
            pension,
            health,
            social,
        }
    }

    pub fn total(&self) -> Money {
        self.pension + self.health + self.social
    }
}

/// The fixed annual contribution an entrepreneur pays for themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelfInsuranceFee {
    pub pension: Money,
    pub health: Money,
}

impl SelfInsuranceFee {
    pub fn new(
        pension: Money,
        health: Money,
    ) -> Self {
        Self { pension, health }
    }

    pub fn total(&self) -> Money {
        self.pension + self.health
    }
}
