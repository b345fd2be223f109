//! Row materializer: column vectors in, typed rows out.

use serde_json::Value as JsonValue;
use thiserror::Error;

use stockshift_core::{StockoutRisk, cell};

use crate::row::{FIELD_COUNT, InventoryField, InventoryRow};
use crate::snapshot::ColumnarSnapshot;

/// Why a snapshot cannot be materialized yet.
///
/// These are not failures: hosts stream columns in incrementally, and every
/// variant means "nothing to show for now".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no columns configured")]
    NoColumns,

    #[error("column {0} has no data")]
    MissingData(String),

    #[error("column {0} has no metadata")]
    MissingInfo(String),

    #[error("column {0} is not an array")]
    NotAnArray(String),

    #[error("column {0} is empty")]
    EmptyColumn(String),
}

/// Field → column vector resolution, computed once per snapshot.
#[derive(Debug)]
struct FieldLayout<'a> {
    slots: [Option<&'a [JsonValue]>; FIELD_COUNT],
}

impl<'a> FieldLayout<'a> {
    fn cell(&self, field: InventoryField, row: usize) -> Option<&'a JsonValue> {
        self.slots[field.slot()].and_then(|cells| cells.get(row))
    }

    fn text(&self, field: InventoryField, row: usize) -> String {
        cell::text(self.cell(field, row))
    }

    fn number(&self, field: InventoryField, row: usize) -> f64 {
        cell::number(self.cell(field, row))
    }

    fn row(&self, i: usize) -> InventoryRow {
        use InventoryField as F;
        InventoryRow {
            product_key: self.text(F::ProductKey, i),
            product_name: self.text(F::ProductName, i),
            sku_number: self.text(F::SkuNumber, i),
            store_key: self.text(F::StoreKey, i),
            store_name: self.text(F::StoreName, i),
            store_city: self.text(F::StoreCity, i),
            quantity_on_hand: self.number(F::QuantityOnHand, i),
            reorder_point: self.number(F::ReorderPoint, i),
            avg_daily_sales_30d: self.number(F::AvgDailySales30d, i),
            avg_daily_sales_90d: self.number(F::AvgDailySales90d, i),
            days_of_supply: self.number(F::DaysOfSupply, i),
            stockout_risk: StockoutRisk::parse(&self.text(F::StockoutRisk, i)),
        }
    }
}

/// Convert the configured columns of `snapshot` into rows.
///
/// Row count is the length of the first configured column; shorter columns
/// contribute default cells for the trailing rows. Columns whose display name
/// is not a known field are ignored, and when two columns map to the same
/// field the later one wins.
pub fn materialize(
    snapshot: &ColumnarSnapshot,
    columns: &[String],
) -> Result<Vec<InventoryRow>, SnapshotError> {
    if columns.is_empty() {
        return Err(SnapshotError::NoColumns);
    }

    let mut layout = FieldLayout {
        slots: [None; FIELD_COUNT],
    };
    let mut row_count = None;

    for id in columns {
        let cells = match snapshot.data.get(id) {
            None | Some(JsonValue::Null) => return Err(SnapshotError::MissingData(id.clone())),
            Some(JsonValue::Array(cells)) => cells.as_slice(),
            Some(_) => return Err(SnapshotError::NotAnArray(id.clone())),
        };
        if cells.is_empty() {
            return Err(SnapshotError::EmptyColumn(id.clone()));
        }
        let info = snapshot
            .column_info
            .get(id)
            .ok_or_else(|| SnapshotError::MissingInfo(id.clone()))?;

        row_count.get_or_insert(cells.len());
        if let Some(field) = InventoryField::from_name(&info.name) {
            layout.slots[field.slot()] = Some(cells);
        }
    }

    let rows = (0..row_count.unwrap_or(0)).map(|i| layout.row(i)).collect();
    Ok(rows)
}
