//! Transfer policy knobs.

use serde::{Deserialize, Serialize};

/// How recommendations are grouped before keeping the best excess match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// `(product_name, shortage_store_name)`. Distinct stores or products
    /// sharing a display name collapse into one group.
    #[default]
    DisplayName,
    /// `(product_key, shortage_store_key)`.
    Identity,
}

/// Thresholds used by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// Hard cap on a single recommended transfer.
    pub max_transfer_qty: f64,
    /// Pairs whose spare stock is at or below this are not worth a transfer.
    pub min_excess_available: f64,
    /// Days of projected consumption the excess store keeps for itself.
    pub reserve_days: f64,
    pub dedup_key: DedupKey,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            max_transfer_qty: 100.0,
            min_excess_available: 10.0,
            reserve_days: 30.0,
            dedup_key: DedupKey::DisplayName,
        }
    }
}

impl TransferPolicy {
    pub fn with_max_transfer_qty(mut self, max: f64) -> Self {
        self.max_transfer_qty = max;
        self
    }

    pub fn with_min_excess_available(mut self, min: f64) -> Self {
        self.min_excess_available = min;
        self
    }

    pub fn with_reserve_days(mut self, days: f64) -> Self {
        self.reserve_days = days;
        self
    }

    pub fn with_dedup_key(mut self, key: DedupKey) -> Self {
        self.dedup_key = key;
        self
    }
}
