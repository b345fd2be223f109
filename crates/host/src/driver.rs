use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use stockshift_core::CardIndex;
use stockshift_transfers::{
    ColumnarSnapshot, MemoStats, MemoizedPipeline, TransferPipeline, TransferPolicy,
    TransferRecommendation,
};

use crate::config::HostConfig;
use crate::dispatch::{TransferDispatcher, TransferRequest};

/// What the host renders: the card at the configured position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferCard {
    pub card_number: CardIndex,
    /// CSS padding length for the card container.
    pub container_padding: &'static str,
    /// Zero or one recommendation.
    pub recommendations: Vec<TransferRecommendation>,
}

impl TransferCard {
    pub fn recommendation(&self) -> Option<&TransferRecommendation> {
        self.recommendations.first()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Glue between the host and the pipeline.
///
/// Holds the configuration, the memoized pipeline and the dispatcher; each
/// `refresh` re-derives the card from the latest snapshot.
#[derive(Debug)]
pub struct TransferCardDriver {
    config: HostConfig,
    pipeline: MemoizedPipeline,
    dispatcher: TransferDispatcher,
}

impl TransferCardDriver {
    pub fn new(config: HostConfig, dispatcher: TransferDispatcher) -> Self {
        let pipeline = MemoizedPipeline::new(TransferPipeline::new(config.policy.clone()));
        Self {
            config,
            pipeline,
            dispatcher,
        }
    }

    /// Driver dispatching to logging sinks named by the config.
    pub fn with_logging_sinks(config: HostConfig) -> Self {
        let dispatcher = TransferDispatcher::logging(&config.sinks);
        Self::new(config, dispatcher)
    }

    pub fn stats(&self) -> MemoStats {
        self.pipeline.stats()
    }

    /// Move to another card. The cached ranking is kept.
    pub fn set_card_index(&mut self, card_index: CardIndex) {
        self.config.card_index = card_index;
    }

    /// Swap the transfer policy. The next refresh recomputes the ranking.
    pub fn set_policy(&mut self, policy: TransferPolicy) {
        self.pipeline.set_policy(policy.clone());
        self.config.policy = policy;
    }

    pub fn refresh(&mut self, snapshot: &Arc<ColumnarSnapshot>) -> TransferCard {
        let recommendations = match &self.config.source {
            Some(source) => {
                let out =
                    self.pipeline
                        .run(snapshot, &self.config.columns, self.config.card_index);
                debug!(
                    source = %source,
                    card = %self.config.card_index,
                    found = out.len(),
                    "card refreshed"
                );
                out
            }
            None => {
                debug!("no source configured; rendering empty card");
                Vec::new()
            }
        };

        TransferCard {
            card_number: self.config.card_index,
            container_padding: self.config.container_padding.as_css(),
            recommendations,
        }
    }

    /// Issue a transfer request for the card's recommendation, if any.
    pub fn initiate(&self, card: &TransferCard) -> Option<TransferRequest> {
        let Some(rec) = card.recommendation() else {
            warn!(card = %card.card_number, "nothing to transfer on this card");
            return None;
        };
        let request = self.dispatcher.initiate(rec)?;
        info!(transfer_id = %request.transfer_id, "transfer request issued");
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Arc<ColumnarSnapshot> {
        Arc::new(
            ColumnarSnapshot::new()
                .with_column("a", "product_key", vec![json!("P1"), json!("P1")])
                .with_column("b", "store_key", vec![json!("S1"), json!("E1")])
                .with_column("c", "store_name", vec![json!("North"), json!("Depot")])
                .with_column("d", "quantity_on_hand", vec![json!(5), json!(200)])
                .with_column("e", "reorder_point", vec![json!(20), json!(10)])
                .with_column("f", "avg_daily_sales_30d", vec![json!(1), json!(1)])
                .with_column("g", "stockout_risk", vec![json!("Critical"), json!("Overstocked")]),
        )
    }

    fn config(snapshot: &ColumnarSnapshot) -> HostConfig {
        HostConfig::default()
            .with_source("inventory")
            .with_columns(snapshot.column_ids())
    }

    #[test]
    fn unconfigured_source_renders_empty_card() {
        let snap = snapshot();
        let mut driver = TransferCardDriver::with_logging_sinks(HostConfig::default());
        let card = driver.refresh(&snap);
        assert!(card.is_empty());
        assert_eq!(card.container_padding, "1rem");
        assert!(driver.initiate(&card).is_none());
    }

    #[test]
    fn card_index_change_reuses_ranking() {
        let snap = snapshot();
        let mut driver = TransferCardDriver::with_logging_sinks(config(&snap));

        let first = driver.refresh(&snap);
        assert_eq!(first.recommendation().unwrap().recommended_transfer_qty, 15.0);

        driver.set_card_index(CardIndex::new(2).unwrap());
        let second = driver.refresh(&snap);
        assert!(second.is_empty());
        assert_eq!(second.card_number.get(), 2);
        assert_eq!(driver.stats(), MemoStats { hits: 1, misses: 1 });
    }

    #[test]
    fn policy_change_recomputes_the_card() {
        let snap = snapshot();
        let mut driver = TransferCardDriver::with_logging_sinks(config(&snap));
        assert_eq!(
            driver.refresh(&snap).recommendation().unwrap().recommended_transfer_qty,
            15.0
        );

        driver.set_policy(TransferPolicy::default().with_max_transfer_qty(10.0));
        let capped = driver.refresh(&snap);
        assert_eq!(capped.recommendation().unwrap().recommended_transfer_qty, 10.0);
        assert_eq!(driver.stats(), MemoStats { hits: 0, misses: 2 });

        driver.set_policy(TransferPolicy::default().with_min_excess_available(500.0));
        assert!(driver.refresh(&snap).is_empty());
        assert_eq!(driver.stats().misses, 3);
    }

    #[test]
    fn card_serializes_for_the_host() {
        let snap = snapshot();
        let mut driver = TransferCardDriver::with_logging_sinks(config(&snap));
        let value = serde_json::to_value(driver.refresh(&snap)).unwrap();
        assert_eq!(value["card_number"], json!(1));
        assert_eq!(value["recommendations"][0]["shortage_store_key"], json!("S1"));
    }
}
