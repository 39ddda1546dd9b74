use rust_decimal::Decimal;
use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that stop a calculator from being built or a calculation from
/// running. None of them are retried; no partial aggregate is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxCalculationError {
    /// The entity type / regime pair has no calculator.
    #[error("unsupported combination: entity '{entity}' with regime '{regime}'")]
    UnsupportedCombination { entity: String, regime: String },

    /// A rate or amount for the target year could not be resolved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reported figures must be validated non-negative before reaching the engine.
    #[error("{field} must not be negative, got {value}")]
    NegativeInput { field: &'static str, value: Decimal },

    /// Reported figures are whole kopecks.
    #[error("{field} must have at most 2 decimal places, got {value}")]
    ExcessPrecision { field: &'static str, value: Decimal },

    /// Reported figures are capped so every intermediate amount stays in range.
    #[error("{field} must not exceed {limit}, got {value}")]
    AmountTooLarge {
        field: &'static str,
        value: Decimal,
        limit: Decimal,
    },

    /// Salary is reported net of withholding and is grossed up by
    /// `1 / (1 - rate)`, so the rate is capped well below one.
    #[error("withholding rate must not exceed {limit}, got {value}")]
    WithholdingRateTooHigh { value: Decimal, limit: Decimal },
}
