//! Tax calculation engine.
//!
//! Every calculation runs in two steps: [`TaxCalculationBase::compute`]
//! derives the payroll and contribution figures every regime shares, then
//! the regime calculator for the concrete parameter type combines them with
//! the regime's own formulas from [`primitives`].

pub mod base;
pub mod common;
pub mod primitives;
pub mod regimes;

#[cfg(test)]
pub(crate) mod test_support;

pub use base::TaxCalculationBase;
pub use primitives::{FinalTotal, VatSplit};
pub use regimes::RegimeCalculation;
