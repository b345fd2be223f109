//! `stockshift-transfers`
//!
//! Derives inventory-transfer recommendations from a columnar inventory
//! snapshot: stores about to run out of a product are paired with stores
//! overstocked on it, and the pairs are ranked by urgency.
//!
//! Deterministic, in-memory, no IO. Stages:
//! - [`materialize`](materialize::materialize): column vectors → typed rows
//! - [`classify`](classify::classify): shortage / excess partition
//! - [`match_transfers`](matcher::match_transfers): product-key join + derived metrics
//! - [`deduplicate`](dedup::deduplicate): best excess match per shortage store
//! - [`rank`](rank::rank) / [`select`](rank::select): priority order, card pick

pub mod classify;
pub mod dedup;
pub mod materialize;
pub mod matcher;
pub mod pipeline;
pub mod policy;
pub mod rank;
pub mod recommendation;
pub mod row;
pub mod snapshot;

pub use materialize::SnapshotError;
pub use pipeline::{MemoStats, MemoizedPipeline, TransferPipeline};
pub use policy::{DedupKey, TransferPolicy};
pub use recommendation::TransferRecommendation;
pub use row::{InventoryField, InventoryRow};
pub use snapshot::{ColumnInfo, ColumnarSnapshot, SnapshotDocument};
