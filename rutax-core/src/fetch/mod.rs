//! Rate resolution and calculator assembly.

pub mod factory;
pub mod fetcher;

pub use factory::{TaxCalculator, TaxCalculatorFactory};
pub use fetcher::{FetchError, TaxAmountFetcher, TaxAmountKind, TaxRateFetcher, TaxRateKind};
