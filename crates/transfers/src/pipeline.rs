//! End-to-end derivation and its memoized wrapper.

use std::sync::Arc;

use tracing::debug;

use stockshift_core::CardIndex;

use crate::classify::classify;
use crate::dedup::deduplicate;
use crate::materialize::materialize;
use crate::matcher::match_transfers;
use crate::policy::TransferPolicy;
use crate::rank::{rank, select};
use crate::recommendation::TransferRecommendation;
use crate::snapshot::ColumnarSnapshot;

/// Pure pipeline: materialize → classify → match → deduplicate → rank.
///
/// Never fails. A snapshot that is not fully loaded yields an empty list.
#[derive(Debug, Clone, Default)]
pub struct TransferPipeline {
    policy: TransferPolicy,
}

impl TransferPipeline {
    pub fn new(policy: TransferPolicy) -> Self {
        Self { policy }
    }

    /// All recommendations, most urgent first.
    pub fn ranked(
        &self,
        snapshot: &ColumnarSnapshot,
        columns: &[String],
    ) -> Vec<TransferRecommendation> {
        let rows = match materialize(snapshot, columns) {
            Ok(rows) => rows,
            Err(reason) => {
                debug!(%reason, "snapshot not ready; no recommendations");
                return Vec::new();
            }
        };

        let partition = classify(&rows);
        let matched = match_transfers(&partition, &self.policy);
        let matched_count = matched.len();
        let deduped = deduplicate(matched, self.policy.dedup_key);

        debug!(
            rows = rows.len(),
            shortage = partition.shortage.len(),
            excess = partition.excess.len(),
            matched = matched_count,
            recommendations = deduped.len(),
            "transfer pipeline evaluated"
        );

        rank(deduped)
    }

    /// Zero or one recommendation: the one at `card_index`.
    pub fn run(
        &self,
        snapshot: &ColumnarSnapshot,
        columns: &[String],
        card_index: CardIndex,
    ) -> Vec<TransferRecommendation> {
        let ranked = self.ranked(snapshot, columns);
        select(&ranked, card_index).cloned().into_iter().collect()
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct MemoEntry {
    snapshot: Arc<ColumnarSnapshot>,
    columns: Vec<String>,
    ranked: Arc<[TransferRecommendation]>,
}

impl MemoEntry {
    fn matches(&self, snapshot: &Arc<ColumnarSnapshot>, columns: &[String]) -> bool {
        self.columns == columns
            && (Arc::ptr_eq(&self.snapshot, snapshot) || *self.snapshot == **snapshot)
    }
}

/// [`TransferPipeline`] with a single-entry cache of the ranked list.
///
/// The cache is keyed by the snapshot (pointer identity first, structural
/// equality second) and the configured column list. Changing only the card
/// index re-selects from the cached list without redoing the join.
#[derive(Debug, Default)]
pub struct MemoizedPipeline {
    pipeline: TransferPipeline,
    entry: Option<MemoEntry>,
    stats: MemoStats,
}

impl MemoizedPipeline {
    pub fn new(pipeline: TransferPipeline) -> Self {
        Self {
            pipeline,
            entry: None,
            stats: MemoStats::default(),
        }
    }

    /// Replace the policy; the cached result is dropped.
    pub fn set_policy(&mut self, policy: TransferPolicy) {
        self.pipeline = TransferPipeline::new(policy);
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    /// Ranked list for these inputs, computed at most once per distinct input.
    pub fn ranked(
        &mut self,
        snapshot: &Arc<ColumnarSnapshot>,
        columns: &[String],
    ) -> Arc<[TransferRecommendation]> {
        if let Some(entry) = &self.entry {
            if entry.matches(snapshot, columns) {
                self.stats.hits += 1;
                return Arc::clone(&entry.ranked);
            }
        }

        self.stats.misses += 1;
        let ranked: Arc<[TransferRecommendation]> =
            self.pipeline.ranked(snapshot, columns).into();
        self.entry = Some(MemoEntry {
            snapshot: Arc::clone(snapshot),
            columns: columns.to_vec(),
            ranked: Arc::clone(&ranked),
        });
        ranked
    }

    /// Zero or one recommendation: the one at `card_index`.
    pub fn run(
        &mut self,
        snapshot: &Arc<ColumnarSnapshot>,
        columns: &[String],
        card_index: CardIndex,
    ) -> Vec<TransferRecommendation> {
        let ranked = self.ranked(snapshot, columns);
        select(&ranked, card_index).cloned().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<String> {
        ["pk", "pn", "sk", "sn", "qoh", "rp", "s30", "s90", "dos", "risk"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn snapshot(excess_qoh: i64) -> ColumnarSnapshot {
        ColumnarSnapshot::new()
            .with_column("pk", "product_key", vec![json!("P1"), json!("P1"), json!("P2")])
            .with_column(
                "pn",
                "product_name",
                vec![json!("Widget"), json!("Widget"), json!("Gizmo")],
            )
            .with_column("sk", "store_key", vec![json!("S1"), json!("E1"), json!("S2")])
            .with_column("sn", "store_name", vec![json!("North"), json!("Depot"), json!("South")])
            .with_column("qoh", "quantity_on_hand", vec![json!(5), json!(excess_qoh), json!(0)])
            .with_column("rp", "reorder_point", vec![json!(20), json!(10), json!(15)])
            .with_column("s30", "avg_daily_sales_30d", vec![json!(2), json!(1), json!(1)])
            .with_column("s90", "avg_daily_sales_90d", vec![json!(1), json!(1), json!(1)])
            .with_column("dos", "days_of_supply", vec![json!(2), json!(200), json!(0)])
            .with_column(
                "risk",
                "stockout_risk",
                vec![json!("Critical"), json!("Overstocked"), json!("High")],
            )
    }

    #[test]
    fn runs_all_stages() {
        let pipeline = TransferPipeline::default();
        let ranked = pipeline.ranked(&snapshot(200), &columns());
        assert_eq!(ranked.len(), 1);
        let rec = &ranked[0];
        assert_eq!(rec.shortage_store_name, "North");
        assert_eq!(rec.excess_store_name, "Depot");
        assert_eq!(rec.shortage_needed, 15.0);
        assert_eq!(rec.excess_available, 170.0);
        assert_eq!(rec.recommended_transfer_qty, 15.0);
        assert_eq!(rec.shortage_trend, 100);
        assert_eq!(rec.excess_trend, 0);
    }

    #[test]
    fn not_ready_snapshot_is_empty() {
        let pipeline = TransferPipeline::default();
        let mut cols = columns();
        cols.push("missing".into());
        assert!(pipeline.ranked(&snapshot(200), &cols).is_empty());
        assert!(pipeline.run(&ColumnarSnapshot::new(), &[], CardIndex::FIRST).is_empty());
    }

    #[test]
    fn run_selects_by_position() {
        let pipeline = TransferPipeline::default();
        assert_eq!(pipeline.run(&snapshot(200), &columns(), CardIndex::FIRST).len(), 1);
        let second = CardIndex::new(2).unwrap();
        assert!(pipeline.run(&snapshot(200), &columns(), second).is_empty());
    }

    #[test]
    fn identical_inputs_hit_the_cache() {
        let mut memo = MemoizedPipeline::default();
        let snap = Arc::new(snapshot(200));
        let cols = columns();

        let first = memo.run(&snap, &cols, CardIndex::FIRST);
        let again = memo.run(&snap, &cols, CardIndex::FIRST);
        assert_eq!(first, again);

        // structurally equal but a different allocation
        let copy = Arc::new(snapshot(200));
        memo.run(&copy, &cols, CardIndex::new(2).unwrap());

        assert_eq!(memo.stats(), MemoStats { hits: 2, misses: 1 });
    }

    #[test]
    fn changed_inputs_recompute() {
        let mut memo = MemoizedPipeline::default();
        let cols = columns();

        let before = memo.run(&Arc::new(snapshot(200)), &cols, CardIndex::FIRST);
        let after = memo.run(&Arc::new(snapshot(300)), &cols, CardIndex::FIRST);
        assert_eq!(before[0].excess_available, 170.0);
        assert_eq!(after[0].excess_available, 270.0);

        memo.run(&Arc::new(snapshot(300)), &cols[..9], CardIndex::FIRST);
        assert_eq!(memo.stats().misses, 3);
    }

    #[test]
    fn policy_change_invalidates() {
        let mut memo = MemoizedPipeline::default();
        let snap = Arc::new(snapshot(200));
        let cols = columns();
        memo.ranked(&snap, &cols);

        memo.set_policy(TransferPolicy::default().with_min_excess_available(500.0));
        assert!(memo.ranked(&snap, &cols).is_empty());
        assert_eq!(memo.stats(), MemoStats { hits: 0, misses: 2 });
    }
}
