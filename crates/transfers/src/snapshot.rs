//! Column-oriented source table as delivered by the host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Metadata the host attaches to a column id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Human-readable field name (e.g. `stockout_risk`).
    pub name: String,
    #[serde(rename = "columnType", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
}

impl ColumnInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
        }
    }
}

/// Snapshot of a columnar table: column id → cell vector, column id → metadata.
///
/// Cell vectors are kept as raw JSON so partially streamed or malformed columns
/// (missing, `null`, not an array) can be detected instead of rejected at parse
/// time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarSnapshot {
    #[serde(default)]
    pub column_info: HashMap<String, ColumnInfo>,
    #[serde(default)]
    pub data: HashMap<String, JsonValue>,
}

impl ColumnarSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column (builder style). Later calls with the same id replace it.
    pub fn with_column(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        cells: Vec<JsonValue>,
    ) -> Self {
        let id = id.into();
        self.column_info.insert(id.clone(), ColumnInfo::named(name));
        self.data.insert(id, JsonValue::Array(cells));
        self
    }

    /// Ids of every column carrying metadata, sorted for determinism.
    pub fn column_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.column_info.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Snapshot file layout: the configured column list travels with the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub snapshot: ColumnarSnapshot,
}
