use serde::{Deserialize, Serialize};

use stockshift_core::StockoutRisk;

/// A proposed stock movement from an overstocked store to a store at risk of
/// running out of the same product.
///
/// Invariant: `recommended_transfer_qty` is the minimum of `shortage_needed`,
/// `excess_available` and the policy cap; neither operand is negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub product_key: String,
    pub product_name: String,
    pub sku_number: String,

    pub shortage_store_name: String,
    pub shortage_store_key: String,
    pub shortage_city: String,
    pub shortage_qty: f64,
    pub shortage_needed: f64,
    pub shortage_days: f64,
    pub shortage_trend: i64,
    pub shortage_risk: StockoutRisk,

    pub excess_store_name: String,
    pub excess_store_key: String,
    pub excess_city: String,
    pub excess_qty: f64,
    pub excess_available: f64,
    pub excess_days: f64,
    pub excess_trend: i64,

    pub recommended_transfer_qty: f64,
}
