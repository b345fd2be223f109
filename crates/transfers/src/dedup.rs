//! Keep one recommendation per (product, shortage store).

use std::collections::HashMap;

use crate::policy::DedupKey;
use crate::recommendation::TransferRecommendation;

fn group_key(rec: &TransferRecommendation, key: DedupKey) -> (String, String) {
    match key {
        DedupKey::DisplayName => (rec.product_name.clone(), rec.shortage_store_name.clone()),
        DedupKey::Identity => (rec.product_key.clone(), rec.shortage_store_key.clone()),
    }
}

/// Collapse each group to the recommendation with the strictly greatest
/// `excess_available`; on a tie the earlier one stays.
///
/// A group occupies the position of its first member, so the output order is
/// deterministic for a given input order.
pub fn deduplicate(
    recommendations: Vec<TransferRecommendation>,
    key: DedupKey,
) -> Vec<TransferRecommendation> {
    let mut slots: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<TransferRecommendation> = Vec::new();

    for rec in recommendations {
        let group = group_key(&rec, key);
        if let Some(&i) = slots.get(&group) {
            if rec.excess_available > kept[i].excess_available {
                kept[i] = rec;
            }
        } else {
            slots.insert(group, kept.len());
            kept.push(rec);
        }
    }
    kept
}
