//! File-backed sources for the rates and amounts the calculator factory
//! resolves per tax year.

mod rate_table;

pub use rate_table::{RateRecord, RateTable, RateTableError};
