//! Typed inventory rows.

use serde::{Deserialize, Serialize};

use stockshift_core::StockoutRisk;

/// Semantic fields the pipeline reads, addressed by their source display name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InventoryField {
    ProductKey,
    ProductName,
    SkuNumber,
    StoreKey,
    StoreName,
    StoreCity,
    QuantityOnHand,
    ReorderPoint,
    AvgDailySales30d,
    AvgDailySales90d,
    DaysOfSupply,
    StockoutRisk,
}

/// Number of [`InventoryField`] variants.
pub const FIELD_COUNT: usize = 12;

impl InventoryField {
    pub const ALL: [InventoryField; FIELD_COUNT] = [
        Self::ProductKey,
        Self::ProductName,
        Self::SkuNumber,
        Self::StoreKey,
        Self::StoreName,
        Self::StoreCity,
        Self::QuantityOnHand,
        Self::ReorderPoint,
        Self::AvgDailySales30d,
        Self::AvgDailySales90d,
        Self::DaysOfSupply,
        Self::StockoutRisk,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ProductKey => "product_key",
            Self::ProductName => "product_name",
            Self::SkuNumber => "sku_number",
            Self::StoreKey => "store_key",
            Self::StoreName => "store_name",
            Self::StoreCity => "store_city",
            Self::QuantityOnHand => "quantity_on_hand",
            Self::ReorderPoint => "reorder_point",
            Self::AvgDailySales30d => "avg_daily_sales_30d",
            Self::AvgDailySales90d => "avg_daily_sales_90d",
            Self::DaysOfSupply => "days_of_supply",
            Self::StockoutRisk => "stockout_risk",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// One store/product row of the inventory snapshot, with every cell already
/// coerced (text defaults to `""`, numbers to `0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_key: String,
    pub product_name: String,
    pub sku_number: String,
    pub store_key: String,
    pub store_name: String,
    pub store_city: String,
    pub quantity_on_hand: f64,
    pub reorder_point: f64,
    pub avg_daily_sales_30d: f64,
    pub avg_daily_sales_90d: f64,
    pub days_of_supply: f64,
    pub stockout_risk: StockoutRisk,
}

impl InventoryRow {
    /// Row with every field at its default.
    pub fn blank() -> Self {
        Self {
            product_key: String::new(),
            product_name: String::new(),
            sku_number: String::new(),
            store_key: String::new(),
            store_name: String::new(),
            store_city: String::new(),
            quantity_on_hand: 0.0,
            reorder_point: 0.0,
            avg_daily_sales_30d: 0.0,
            avg_daily_sales_90d: 0.0,
            days_of_supply: 0.0,
            stockout_risk: StockoutRisk::Other(String::new()),
        }
    }

    /// Percent change of the 30-day sales rate against the 90-day rate.
    pub fn sales_trend(&self) -> i64 {
        percent_change(self.avg_daily_sales_30d, self.avg_daily_sales_90d)
    }
}

/// `round((recent - baseline) / baseline * 100)`, or 0 when the baseline is 0.
///
/// Halves round toward positive infinity (`-12.5` → `-12`).
pub fn percent_change(recent: f64, baseline: f64) -> i64 {
    if baseline == 0.0 {
        return 0;
    }
    let pct = (recent - baseline) / baseline * 100.0;
    if !pct.is_finite() {
        return 0;
    }
    (pct + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in InventoryField::ALL {
            assert_eq!(InventoryField::from_name(field.name()), Some(field));
        }
        assert_eq!(InventoryField::from_name("distance"), None);
    }

    #[test]
    fn slots_are_dense() {
        for (i, field) in InventoryField::ALL.into_iter().enumerate() {
            assert_eq!(field.slot(), i);
        }
    }

    #[test]
    fn trend_is_zero_without_baseline() {
        assert_eq!(percent_change(5.0, 0.0), 0);
        assert_eq!(percent_change(0.0, 0.0), 0);
    }

    #[test]
    fn trend_rounds_half_up() {
        assert_eq!(percent_change(12.0, 10.0), 20);
        assert_eq!(percent_change(8.0, 10.0), -20);
        // -12.5% and +12.5%
        assert_eq!(percent_change(7.0, 8.0), -12);
        assert_eq!(percent_change(9.0, 8.0), 13);
    }

    #[test]
    fn row_trend_uses_sales_rates() {
        let mut row = InventoryRow::blank();
        row.avg_daily_sales_30d = 3.0;
        row.avg_daily_sales_90d = 2.0;
        assert_eq!(row.sales_trend(), 50);
    }
}
