//! Shortage / excess classification.

use crate::row::InventoryRow;

/// Rows split into the two sides of a transfer. Rows matching neither side are
/// dropped; no row can match both.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub shortage: Vec<&'a InventoryRow>,
    pub excess: Vec<&'a InventoryRow>,
}

/// Store is about to run out (`Critical` or `High` risk).
pub fn is_shortage(row: &InventoryRow) -> bool {
    row.stockout_risk.is_shortage()
}

/// Store is overstocked and still selling. Overstocked rows with no recent
/// sales velocity are never transfer sources.
pub fn is_excess(row: &InventoryRow) -> bool {
    row.stockout_risk.is_overstocked() && row.avg_daily_sales_30d > 0.0
}

/// Partition rows, preserving source order on each side.
pub fn classify(rows: &[InventoryRow]) -> Partition<'_> {
    let mut partition = Partition::default();
    for row in rows {
        if is_shortage(row) {
            partition.shortage.push(row);
        } else if is_excess(row) {
            partition.excess.push(row);
        }
    }
    partition
}
