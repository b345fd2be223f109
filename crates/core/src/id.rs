//! Identifiers and selectors used across the domain.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier handed to the host when a transfer request is initiated.
///
/// Format: `TR-<unix millis>-<4 digit suffix>`. Uniqueness is best-effort
/// (clock + random suffix); two ids minted in the same millisecond collide with
/// probability 1/10000.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(String);

impl TransferId {
    pub const PREFIX: &'static str = "TR";

    /// Mint an id from the current wall clock and the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now(), &mut rand::rng())
    }

    /// Mint an id from an explicit clock reading and RNG (deterministic in tests).
    pub fn generate_at<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        Self::from_parts(now.timestamp_millis(), rng.random_range(0..10_000))
    }

    pub fn from_parts(millis: i64, suffix: u16) -> Self {
        Self(format!("{}-{millis}-{:04}", Self::PREFIX, suffix % 10_000))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TransferId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TransferId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::invalid_id(format!("TransferId: {s:?}"));

        let rest = s
            .strip_prefix(Self::PREFIX)
            .and_then(|r| r.strip_prefix('-'))
            .ok_or_else(invalid)?;
        let (millis, suffix) = rest.rsplit_once('-').ok_or_else(invalid)?;

        let millis_ok = !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit());
        let suffix_ok = suffix.len() == 4 && suffix.bytes().all(|b| b.is_ascii_digit());
        if !(millis_ok && suffix_ok) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }
}

/// 1-based position of the recommendation a card displays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CardIndex(usize);

impl CardIndex {
    /// Highest position a host may select.
    pub const MAX: usize = 10;

    pub const FIRST: CardIndex = CardIndex(1);

    pub fn new(position: usize) -> DomainResult<Self> {
        if (1..=Self::MAX).contains(&position) {
            Ok(Self(position))
        } else {
            Err(DomainError::validation(format!(
                "card index must be within 1..={}, got {position}",
                Self::MAX
            )))
        }
    }

    /// Lenient parse for host-supplied selector strings.
    ///
    /// Reads the leading integer (`"3rd"` is 3); anything unparsable, zero, or
    /// out of range selects the first card.
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits
            .parse::<usize>()
            .ok()
            .and_then(|n| Self::new(n).ok())
            .unwrap_or(Self::FIRST)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Zero-based offset into a ranked list.
    pub fn offset(self) -> usize {
        self.0 - 1
    }
}

impl Default for CardIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<usize> for CardIndex {
    type Error = DomainError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardIndex> for usize {
    fn from(value: CardIndex) -> Self {
        value.0
    }
}

impl core::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
