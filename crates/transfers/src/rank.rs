//! Priority ordering and card selection.

use core::cmp::Ordering;

use stockshift_core::CardIndex;

use crate::recommendation::TransferRecommendation;

/// Priority comparator, ascending = more urgent first:
///
/// 1. `Critical` shortages before every other risk label
/// 2. fewer days of supply at the shortage store
/// 3. larger recommended transfer
pub fn priority(a: &TransferRecommendation, b: &TransferRecommendation) -> Ordering {
    a.shortage_risk
        .urgency_tier()
        .cmp(&b.shortage_risk.urgency_tier())
        .then_with(|| cmp_f64(a.shortage_days, b.shortage_days))
        .then_with(|| cmp_f64(b.recommended_transfer_qty, a.recommended_transfer_qty))
}

// Coerced metrics are never NaN; `-0.0` and `0.0` compare equal.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sort by [`priority`]. The sort is stable: equal recommendations keep their
/// input order.
pub fn rank(mut recommendations: Vec<TransferRecommendation>) -> Vec<TransferRecommendation> {
    recommendations.sort_by(priority);
    recommendations
}

/// Recommendation at a 1-based position, if the list is long enough.
pub fn select(
    ranked: &[TransferRecommendation],
    index: CardIndex,
) -> Option<&TransferRecommendation> {
    ranked.get(index.offset())
}
