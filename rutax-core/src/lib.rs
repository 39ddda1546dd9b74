pub mod calculations;
pub mod error;
pub mod fetch;
pub mod models;
pub mod report;

pub use calculations::{RegimeCalculation, TaxCalculationBase};
pub use error::TaxCalculationError;
pub use fetch::{
    FetchError, TaxAmountFetcher, TaxAmountKind, TaxCalculator, TaxCalculatorFactory,
    TaxRateFetcher, TaxRateKind,
};
pub use models::*;
pub use report::{TaxComparison, TaxReportDetails};
