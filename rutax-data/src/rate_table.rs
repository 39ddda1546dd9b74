use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use rust_decimal::Decimal;
use rutax_core::{
    FetchError, Money, Rate, RateError, TaxAmountFetcher, TaxAmountKind, TaxRateFetcher,
    TaxRateKind,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a rate table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown kind '{kind}' in year {year}")]
    UnknownKind { kind: String, year: i32 },

    #[error("duplicate entry for '{kind}' in year {year}")]
    Duplicate { kind: String, year: i32 },

    #[error("invalid rate for '{kind}' in year {year}: {source}")]
    InvalidRate {
        kind: TaxRateKind,
        year: i32,
        source: RateError,
    },

    #[error("amount for '{kind}' in year {year} must not be negative, got {value}")]
    NegativeAmount {
        kind: TaxAmountKind,
        year: i32,
        value: Decimal,
    },
}

impl From<csv::Error> for RateTableError {
    fn from(err: csv::Error) -> Self {
        RateTableError::CsvParse(err.to_string())
    }
}

/// A single row of the rate CSV file.
///
/// - `tax_year`: the tax year (e.g., 2024)
/// - `kind`: a rate code such as `usn_income` or an amount code such as
///   `self_pension`
/// - `value`: a rate as a decimal fraction (0.06 for 6%) or an amount in
///   roubles
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateRecord {
    pub tax_year: i32,
    pub kind: String,
    pub value: Decimal,
}

/// Rates and amounts for any number of tax years, loaded from CSV.
///
/// Implements both [`TaxRateFetcher`] and [`TaxAmountFetcher`], so one table
/// can back a [`TaxCalculatorFactory`](rutax_core::TaxCalculatorFactory).
/// A lookup for a year or kind the table lacks fails; nothing is carried
/// over from neighbouring years.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use rutax_core::{Rate, TaxRateFetcher, TaxRateKind};
/// use rutax_data::RateTable;
///
/// let csv = "tax_year,kind,value\n2024,usn_income,0.06\n2024,self_pension,49500\n";
/// let table = RateTable::from_reader(csv.as_bytes()).unwrap();
///
/// assert_eq!(
///     table.fetch_rate(TaxRateKind::UsnIncome, 2024),
///     Ok(Rate::new(dec!(0.06)).unwrap())
/// );
/// assert!(table.fetch_rate(TaxRateKind::UsnIncome, 2023).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    rates: HashMap<(i32, TaxRateKind), Rate>,
    amounts: HashMap<(i32, TaxAmountKind), Money>,
}

impl RateTable {
    /// Parse rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateRecord>, RateTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Builds a table from parsed records.
    ///
    /// Each `(tax_year, kind)` pair may appear once. Rates must lie in
    /// `[0, 1]` and amounts must not be negative.
    pub fn from_records(records: &[RateRecord]) -> Result<Self, RateTableError> {
        let mut table = Self::default();

        for record in records {
            table.insert(record)?;
        }

        debug!(
            rates = table.rates.len(),
            amounts = table.amounts.len(),
            years = ?table.years(),
            "loaded rate table"
        );

        Ok(table)
    }

    /// Parses and builds in one step.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        Self::from_records(&Self::parse(reader)?)
    }

    fn insert(
        &mut self,
        record: &RateRecord,
    ) -> Result<(), RateTableError> {
        let year = record.tax_year;
        let duplicate = || RateTableError::Duplicate {
            kind: record.kind.clone(),
            year,
        };

        if let Some(kind) = TaxRateKind::parse(&record.kind) {
            let rate = Rate::new(record.value).map_err(|source| RateTableError::InvalidRate {
                kind,
                year,
                source,
            })?;
            if self.rates.insert((year, kind), rate).is_some() {
                return Err(duplicate());
            }
        } else if let Some(kind) = TaxAmountKind::parse(&record.kind) {
            if record.value < Decimal::ZERO {
                return Err(RateTableError::NegativeAmount {
                    kind,
                    year,
                    value: record.value,
                });
            }
            if self.amounts.insert((year, kind), Money::new(record.value)).is_some() {
                return Err(duplicate());
            }
        } else {
            return Err(RateTableError::UnknownKind {
                kind: record.kind.clone(),
                year,
            });
        }

        Ok(())
    }

    /// Every year with at least one entry, ascending.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .rates
            .keys()
            .map(|(year, _)| *year)
            .chain(self.amounts.keys().map(|(year, _)| *year))
            .collect();
        years.into_iter().collect()
    }

    /// Number of rate and amount entries.
    pub fn len(&self) -> usize {
        self.rates.len() + self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaxRateFetcher for RateTable {
    fn fetch_rate(
        &self,
        kind: TaxRateKind,
        year: i32,
    ) -> Result<Rate, FetchError> {
        self.rates
            .get(&(year, kind))
            .copied()
            .ok_or(FetchError::RateNotFound { kind, year })
    }
}

impl TaxAmountFetcher for RateTable {
    fn fetch_amount(
        &self,
        kind: TaxAmountKind,
        year: i32,
    ) -> Result<Money, FetchError> {
        self.amounts
            .get(&(year, kind))
            .copied()
            .ok_or(FetchError::AmountNotFound { kind, year })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,kind,value
2024,ndfl,0.13
2024,usn_income,0.06
2024,self_pension,49500
2024,self_health,0
2025,usn_income,0.06
"#;

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parse_reads_all_rows() {
        let records = RateTable::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0],
            RateRecord {
                tax_year: 2024,
                kind: "ndfl".to_string(),
                value: dec!(0.13),
            }
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        let csv = "tax_year, kind, value\n2024, nds, 0.20\n";

        let records = RateTable::parse(csv.as_bytes()).unwrap();

        assert_eq!(records[0].kind, "nds");
        assert_eq!(records[0].value, dec!(0.20));
    }

    #[test]
    fn parse_rejects_non_numeric_value() {
        let csv = "tax_year,kind,value\n2024,nds,twenty\n";

        let result = RateTable::parse(csv.as_bytes());

        assert!(matches!(result, Err(RateTableError::CsvParse(_))));
    }

    #[test]
    fn parse_rejects_missing_column() {
        let csv = "tax_year,kind\n2024,nds\n";

        let result = RateTable::parse(csv.as_bytes());

        assert!(matches!(result, Err(RateTableError::CsvParse(_))));
    }

    // =========================================================================
    // from_records tests
    // =========================================================================

    #[test]
    fn table_splits_rates_and_amounts() {
        let table = RateTable::from_reader(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.years(), vec![2024, 2025]);
        assert_eq!(
            table.fetch_amount(TaxAmountKind::SelfPension, 2024),
            Ok(Money::new(dec!(49500)))
        );
        assert_eq!(
            table.fetch_amount(TaxAmountKind::SelfHealth, 2024),
            Ok(Money::ZERO)
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let csv = "tax_year,kind,value\n2024,vat,0.20\n";

        let result = RateTable::from_reader(csv.as_bytes());

        assert_eq!(
            result,
            Err(RateTableError::UnknownKind {
                kind: "vat".to_string(),
                year: 2024,
            })
        );
    }

    #[test]
    fn duplicate_entry_is_rejected() {
        let csv = "tax_year,kind,value\n2024,nds,0.20\n2024,nds,0.18\n";

        let result = RateTable::from_reader(csv.as_bytes());

        assert_eq!(
            result,
            Err(RateTableError::Duplicate {
                kind: "nds".to_string(),
                year: 2024,
            })
        );
    }

    #[test]
    fn same_kind_in_different_years_is_allowed() {
        let csv = "tax_year,kind,value\n2024,profit_tax,0.20\n2025,profit_tax,0.25\n";

        let table = RateTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            table.fetch_rate(TaxRateKind::ProfitTax, 2025),
            Ok(Rate::new(dec!(0.25)).unwrap())
        );
    }

    #[test]
    fn percentage_written_as_whole_number_is_rejected() {
        let csv = "tax_year,kind,value\n2024,usn_income,6\n";

        let result = RateTable::from_reader(csv.as_bytes());

        assert_eq!(
            result,
            Err(RateTableError::InvalidRate {
                kind: TaxRateKind::UsnIncome,
                year: 2024,
                source: RateError::OutOfRange(dec!(6)),
            })
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let csv = "tax_year,kind,value\n2024,additional_contribution_limit,-1\n";

        let result = RateTable::from_reader(csv.as_bytes());

        assert_eq!(
            result,
            Err(RateTableError::NegativeAmount {
                kind: TaxAmountKind::AdditionalContributionLimit,
                year: 2024,
                value: dec!(-1),
            })
        );
    }

    // =========================================================================
    // fetcher tests
    // =========================================================================

    #[test]
    fn missing_year_is_not_found() {
        let table = RateTable::from_reader(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(
            table.fetch_rate(TaxRateKind::Ndfl, 2025),
            Err(FetchError::RateNotFound {
                kind: TaxRateKind::Ndfl,
                year: 2025,
            })
        );
    }

    #[test]
    fn missing_amount_is_not_found() {
        let table = RateTable::from_reader(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(
            table.fetch_amount(TaxAmountKind::AdditionalContributionLimit, 2024),
            Err(FetchError::AmountNotFound {
                kind: TaxAmountKind::AdditionalContributionLimit,
                year: 2024,
            })
        );
    }

    #[test]
    fn empty_table_has_no_years() {
        let table = RateTable::from_reader("tax_year,kind,value\n".as_bytes()).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.years(), Vec::<i32>::new());
    }
}
