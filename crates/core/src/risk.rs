//! Stockout risk categories.

use serde::{Deserialize, Serialize};

/// Stockout risk label attached to a store/product row.
///
/// Labels are matched exactly (case-sensitive). Anything outside the known
/// vocabulary is kept verbatim as `Other` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockoutRisk {
    Critical,
    High,
    Overstocked,
    Other(String),
}

impl StockoutRisk {
    pub fn parse(label: &str) -> Self {
        match label {
            "Critical" => Self::Critical,
            "High" => Self::High,
            "Overstocked" => Self::Overstocked,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Overstocked => "Overstocked",
            Self::Other(s) => s,
        }
    }

    /// Shortage side of a transfer: the store is about to run out.
    pub fn is_shortage(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    pub fn is_overstocked(&self) -> bool {
        matches!(self, Self::Overstocked)
    }

    /// Ranking tier: `Critical` is 0, every other label is 1.
    pub fn urgency_tier(&self) -> u8 {
        if matches!(self, Self::Critical) { 0 } else { 1 }
    }
}

impl From<String> for StockoutRisk {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<StockoutRisk> for String {
    fn from(value: StockoutRisk) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for StockoutRisk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
