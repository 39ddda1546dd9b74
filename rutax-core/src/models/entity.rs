use std::fmt;

use serde::{Deserialize, Serialize};

/// Legal form of the taxpayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// Individual entrepreneur (IP).
    Individual,
    /// Legal entity (OOO and similar).
    Organization,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "IP",
            Self::Organization => "ORG",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IP" => Some(Self::Individual),
            "ORG" => Some(Self::Organization),
            _ => None,
        }
    }

    pub fn is_legal_entity(&self) -> bool {
        matches!(self, Self::Organization)
    }
}

impl fmt::Display for EntityType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taxation regime the taxpayer has elected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Simplified system taxed on gross income ("USN 6%").
    UsnIncome,
    /// Simplified system taxed on income minus expenses ("USN 15%").
    UsnIncomeExpense,
    /// General system: VAT plus personal income tax or profit tax.
    Osn,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsnIncome => "USN6",
            Self::UsnIncomeExpense => "USN15",
            Self::Osn => "OSN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USN6" => Some(Self::UsnIncome),
            "USN15" => Some(Self::UsnIncomeExpense),
            "OSN" => Some(Self::Osn),
            _ => None,
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
