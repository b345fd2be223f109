//! Shortage × excess join on product key.

use std::collections::HashMap;

use crate::classify::Partition;
use crate::policy::TransferPolicy;
use crate::recommendation::TransferRecommendation;
use crate::row::InventoryRow;

/// Join every shortage row with every excess row of the same product and keep
/// the viable pairs.
///
/// Output order: shortage rows in source order, and for each of them the
/// matching excess rows in source order. Several excess stores may match the
/// same shortage row; collapsing them is the deduplicator's job.
pub fn match_transfers(
    partition: &Partition<'_>,
    policy: &TransferPolicy,
) -> Vec<TransferRecommendation> {
    let mut excess_by_product: HashMap<&str, Vec<&InventoryRow>> = HashMap::new();
    for &row in &partition.excess {
        excess_by_product
            .entry(row.product_key.as_str())
            .or_default()
            .push(row);
    }

    let mut out = Vec::new();
    for shortage in &partition.shortage {
        let Some(candidates) = excess_by_product.get(shortage.product_key.as_str()) else {
            continue;
        };
        out.extend(
            candidates
                .iter()
                .filter_map(|excess| pair(shortage, excess, policy)),
        );
    }
    out
}

/// Derive the recommendation for one pair, or `None` if the excess store has
/// too little spare stock.
pub fn pair(
    shortage: &InventoryRow,
    excess: &InventoryRow,
    policy: &TransferPolicy,
) -> Option<TransferRecommendation> {
    let shortage_qty = shortage.quantity_on_hand;
    let shortage_needed = (shortage.reorder_point - shortage_qty).max(0.0);

    let excess_qty = excess.quantity_on_hand;
    let reserved = excess.avg_daily_sales_30d * policy.reserve_days;
    let excess_available = (excess_qty - reserved).max(0.0);

    if excess_available <= policy.min_excess_available {
        return None;
    }

    let recommended_transfer_qty = shortage_needed
        .min(excess_available)
        .min(policy.max_transfer_qty);

    Some(TransferRecommendation {
        product_key: shortage.product_key.clone(),
        product_name: shortage.product_name.clone(),
        sku_number: shortage.sku_number.clone(),

        shortage_store_name: shortage.store_name.clone(),
        shortage_store_key: shortage.store_key.clone(),
        shortage_city: shortage.store_city.clone(),
        shortage_qty,
        shortage_needed,
        shortage_days: shortage.days_of_supply,
        shortage_trend: shortage.sales_trend(),
        shortage_risk: shortage.stockout_risk.clone(),

        excess_store_name: excess.store_name.clone(),
        excess_store_key: excess.store_key.clone(),
        excess_city: excess.store_city.clone(),
        excess_qty,
        excess_available,
        excess_days: excess.days_of_supply,
        excess_trend: excess.sales_trend(),

        recommended_transfer_qty,
    })
}
