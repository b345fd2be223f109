//! Host configuration, sourced once per process from the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use stockshift_core::CardIndex;
use stockshift_observability::LogFormat;
use stockshift_transfers::{DedupKey, TransferPolicy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Padding around the rendered card.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContainerPadding {
    #[serde(rename = "0rem")]
    None,
    #[default]
    #[serde(rename = "1rem")]
    Single,
    #[serde(rename = "2rem")]
    Double,
}

impl ContainerPadding {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::None => "0rem",
            Self::Single => "1rem",
            Self::Double => "2rem",
        }
    }
}

impl FromStr for ContainerPadding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0rem" => Ok(Self::None),
            "1rem" => Ok(Self::Single),
            "2rem" => Ok(Self::Double),
            other => Err(ConfigError::invalid(
                "container_padding",
                other,
                "expected 0rem, 1rem or 2rem",
            )),
        }
    }
}

/// Host variable names the five transfer values are written to.
///
/// `None` leaves that value unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkNames {
    pub shortage_key: Option<String>,
    pub excess_key: Option<String>,
    pub transfer_qty: Option<String>,
    pub transfer_id: Option<String>,
    pub status: Option<String>,
}

impl Default for SinkNames {
    fn default() -> Self {
        Self {
            shortage_key: Some("p-shortageKey".to_string()),
            excess_key: Some("p-excessKey".to_string()),
            transfer_qty: Some("p-TransferRec".to_string()),
            transfer_id: Some("p-TransferId".to_string()),
            status: Some("p-Status".to_string()),
        }
    }
}

/// Everything the driver needs for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Source element id; `None` means no source has been picked yet.
    pub source: Option<String>,
    /// Column ids selected from the source, in configuration order.
    pub columns: Vec<String>,
    pub card_index: CardIndex,
    pub container_padding: ContainerPadding,
    pub policy: TransferPolicy,
    pub sinks: SinkNames,
    pub log_format: LogFormat,
    /// Dispatch the displayed recommendation after rendering (binary only).
    pub initiate: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            source: None,
            columns: Vec::new(),
            card_index: CardIndex::FIRST,
            container_padding: ContainerPadding::default(),
            policy: TransferPolicy::default(),
            sinks: SinkNames::default(),
            log_format: LogFormat::default(),
            initiate: false,
        }
    }
}

impl HostConfig {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_card_index(mut self, card_index: CardIndex) -> Self {
        self.card_index = card_index;
        self
    }

    pub fn with_policy(mut self, policy: TransferPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read `STOCKSHIFT_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable values are logged and
    /// replaced by their defaults; configuration never aborts a refresh.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        cfg.source = get("STOCKSHIFT_SOURCE");

        if let Some(raw) = get("STOCKSHIFT_COLUMNS") {
            cfg.columns = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = get("STOCKSHIFT_CARD_INDEX") {
            cfg.card_index = CardIndex::parse_lenient(&raw);
            if cfg.card_index.get().to_string() != raw.trim() {
                warn!(value = %raw, card_index = cfg.card_index.get(), "card index normalized");
            }
        }

        if let Some(raw) = get("STOCKSHIFT_CONTAINER_PADDING") {
            cfg.container_padding = or_default(raw.parse(), cfg.container_padding);
        }

        if let Some(raw) = get("STOCKSHIFT_MAX_TRANSFER_QTY") {
            cfg.policy.max_transfer_qty = or_default(
                parse_non_negative("STOCKSHIFT_MAX_TRANSFER_QTY", &raw),
                cfg.policy.max_transfer_qty,
            );
        }
        if let Some(raw) = get("STOCKSHIFT_MIN_EXCESS_AVAILABLE") {
            cfg.policy.min_excess_available = or_default(
                parse_non_negative("STOCKSHIFT_MIN_EXCESS_AVAILABLE", &raw),
                cfg.policy.min_excess_available,
            );
        }
        if let Some(raw) = get("STOCKSHIFT_RESERVE_DAYS") {
            cfg.policy.reserve_days = or_default(
                parse_non_negative("STOCKSHIFT_RESERVE_DAYS", &raw),
                cfg.policy.reserve_days,
            );
        }
        if let Some(raw) = get("STOCKSHIFT_DEDUP_KEY") {
            cfg.policy.dedup_key = or_default(parse_dedup_key(&raw), cfg.policy.dedup_key);
        }

        if let Some(raw) = get("STOCKSHIFT_LOG_FORMAT") {
            cfg.log_format = or_default(
                LogFormat::parse(&raw).ok_or_else(|| {
                    ConfigError::invalid("STOCKSHIFT_LOG_FORMAT", &raw, "expected json or pretty")
                }),
                cfg.log_format,
            );
        }

        if let Some(raw) = get("STOCKSHIFT_INITIATE") {
            cfg.initiate = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        let sink_override = |key: &str, current: &mut Option<String>| {
            if let Some(raw) = lookup(key) {
                // An explicitly empty name disables the sink.
                *current = Some(raw.trim().to_string()).filter(|s| !s.is_empty());
            }
        };
        sink_override("STOCKSHIFT_SINK_SHORTAGE_KEY", &mut cfg.sinks.shortage_key);
        sink_override("STOCKSHIFT_SINK_EXCESS_KEY", &mut cfg.sinks.excess_key);
        sink_override("STOCKSHIFT_SINK_TRANSFER_QTY", &mut cfg.sinks.transfer_qty);
        sink_override("STOCKSHIFT_SINK_TRANSFER_ID", &mut cfg.sinks.transfer_id);
        sink_override("STOCKSHIFT_SINK_STATUS", &mut cfg.sinks.status);

        cfg
    }
}

fn or_default<T>(parsed: Result<T, ConfigError>, default: T) -> T {
    match parsed {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "ignoring invalid configuration value");
            default
        }
    }
}

fn parse_non_negative(key: &str, raw: &str) -> Result<f64, ConfigError> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, raw, "not a number"))?;
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(ConfigError::invalid(key, raw, "must be a finite non-negative number"))
    }
}

fn parse_dedup_key(raw: &str) -> Result<DedupKey, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "display_name" | "name" => Ok(DedupKey::DisplayName),
        "identity" | "key" => Ok(DedupKey::Identity),
        _ => Err(ConfigError::invalid(
            "STOCKSHIFT_DEDUP_KEY",
            raw,
            "expected display_name or identity",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = HostConfig::from_lookup(|_| None);
        assert_eq!(cfg, HostConfig::default());
        assert_eq!(cfg.card_index, CardIndex::FIRST);
        assert_eq!(cfg.container_padding.as_css(), "1rem");
        assert_eq!(cfg.policy.max_transfer_qty, 100.0);
        assert_eq!(cfg.sinks.status.as_deref(), Some("p-Status"));
    }

    #[test]
    fn reads_every_setting() {
        let cfg = HostConfig::from_lookup(lookup(&[
            ("STOCKSHIFT_SOURCE", "inventory-snapshot"),
            ("STOCKSHIFT_COLUMNS", "c1, c2,,c3"),
            ("STOCKSHIFT_CARD_INDEX", "4"),
            ("STOCKSHIFT_CONTAINER_PADDING", "2rem"),
            ("STOCKSHIFT_MAX_TRANSFER_QTY", "250"),
            ("STOCKSHIFT_MIN_EXCESS_AVAILABLE", "5"),
            ("STOCKSHIFT_RESERVE_DAYS", "14"),
            ("STOCKSHIFT_DEDUP_KEY", "identity"),
            ("STOCKSHIFT_LOG_FORMAT", "pretty"),
            ("STOCKSHIFT_INITIATE", "true"),
            ("STOCKSHIFT_SINK_STATUS", ""),
            ("STOCKSHIFT_SINK_TRANSFER_ID", "p-Id"),
        ]));
        assert_eq!(cfg.source.as_deref(), Some("inventory-snapshot"));
        assert_eq!(cfg.columns, vec!["c1", "c2", "c3"]);
        assert_eq!(cfg.card_index.get(), 4);
        assert_eq!(cfg.container_padding, ContainerPadding::Double);
        assert_eq!(cfg.policy.max_transfer_qty, 250.0);
        assert_eq!(cfg.policy.min_excess_available, 5.0);
        assert_eq!(cfg.policy.reserve_days, 14.0);
        assert_eq!(cfg.policy.dedup_key, DedupKey::Identity);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(cfg.initiate);
        assert_eq!(cfg.sinks.status, None);
        assert_eq!(cfg.sinks.transfer_id.as_deref(), Some("p-Id"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = HostConfig::from_lookup(lookup(&[
            ("STOCKSHIFT_CARD_INDEX", "0"),
            ("STOCKSHIFT_CONTAINER_PADDING", "3rem"),
            ("STOCKSHIFT_MAX_TRANSFER_QTY", "-5"),
            ("STOCKSHIFT_RESERVE_DAYS", "soon"),
            ("STOCKSHIFT_DEDUP_KEY", "sku"),
            ("STOCKSHIFT_LOG_FORMAT", "xml"),
        ]));
        assert_eq!(cfg.card_index, CardIndex::FIRST);
        assert_eq!(cfg.container_padding, ContainerPadding::Single);
        assert_eq!(cfg.policy, TransferPolicy::default());
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn padding_parse_errors_are_typed() {
        let err = "5px".parse::<ContainerPadding>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "container_padding"));
    }

    proptest::proptest! {
        #[test]
        fn any_card_index_setting_stays_in_range(raw in ".{0,12}") {
            let cfg = HostConfig::from_lookup(lookup(&[("STOCKSHIFT_CARD_INDEX", raw.as_str())]));
            proptest::prop_assert!((1..=CardIndex::MAX).contains(&cfg.card_index.get()));
        }

        #[test]
        fn policy_values_never_go_negative(raw in "-?[0-9]{1,4}(\\.[0-9]{1,2})?") {
            let cfg = HostConfig::from_lookup(lookup(&[
                ("STOCKSHIFT_MAX_TRANSFER_QTY", raw.as_str()),
                ("STOCKSHIFT_RESERVE_DAYS", raw.as_str()),
            ]));
            proptest::prop_assert!(cfg.policy.max_transfer_qty >= 0.0);
            proptest::prop_assert!(cfg.policy.reserve_days >= 0.0);
        }
    }
}
