//! Raw and motif scoring
//!
//! Raw points are banked when an item enters a store. Motif points depend
//! on the current primary ordering, so they are recomputed on every query
//! and never stored.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::models::{Alliance, ItemColor, PerAlliance};

/// Ordered colour pattern, e.g. `GPP`. Repeats over the primary store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Motif(Vec<ItemColor>);

impl Motif {
    /// Case-insensitive; whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, FieldError> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|token| {
                ItemColor::from_token(token)
                    .ok_or_else(|| FieldError::InvalidMotif { motif: s.to_string(), token })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Motif)
    }

    pub fn tokens(&self) -> &[ItemColor] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of positions `i` where `colors[i]` matches `motif[i % len]`.
    pub fn matches<I>(&self, colors: I) -> usize
    where
        I: IntoIterator<Item = ItemColor>,
    {
        if self.0.is_empty() {
            return 0;
        }
        colors
            .into_iter()
            .enumerate()
            .filter(|(i, color)| self.0[i % self.0.len()] == *color)
            .count()
    }
}

impl fmt::Display for Motif {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c.token()))
    }
}

impl FromStr for Motif {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Motif::parse(s)
    }
}

impl Serialize for Motif {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Motif {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Motif::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for Motif {
    fn schema_name() -> String {
        "Motif".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// Banked raw points per alliance. Monotonic until `reset`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreLedger {
    raw: PerAlliance<u32>,
}

impl ScoreLedger {
    pub fn add(&mut self, alliance: Alliance, points: u32) {
        let total = self.raw.get_mut(alliance);
        *total = total.saturating_add(points);
    }

    pub fn raw(&self, alliance: Alliance) -> u32 {
        *self.raw.get(alliance)
    }

    pub fn reset(&mut self) {
        self.raw = PerAlliance::default();
    }
}
