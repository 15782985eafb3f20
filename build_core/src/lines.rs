//! Stat line options - discrete enchant / potential / ability roll outcomes

use crate::types::{Rarity, SlotId, StatDelta, StatKind};
use serde::{Deserialize, Serialize};

/// One rollable stat line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLineOption {
    pub stat: StatKind,
    pub value: f64,
    /// Relative selection weight for weighted draws
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    /// Prime lines are the higher-valued variant of a stat at a rarity
    #[serde(default)]
    pub prime: bool,
    /// Restrict the option to these slots (`None` = every slot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotId>>,
}

fn default_weight() -> f64 {
    1.0
}

impl StatLineOption {
    pub fn new(stat: StatKind, value: f64) -> Self {
        StatLineOption {
            stat,
            value,
            weight: default_weight(),
            rarity: None,
            prime: false,
            slots: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn prime(mut self) -> Self {
        self.prime = true;
        self
    }

    pub fn only_for(mut self, slots: &[&str]) -> Self {
        self.slots = Some(slots.iter().map(|s| SlotId::from(*s)).collect());
        self
    }

    /// Whether the option can roll on a slot
    pub fn allows(&self, slot: &SlotId) -> bool {
        self.slots
            .as_ref()
            .map_or(true, |slots| slots.contains(slot))
    }

    /// Finite value and finite, non-negative weight
    pub fn is_well_formed(&self) -> bool {
        self.value.is_finite() && self.weight.is_finite() && self.weight >= 0.0
    }

    pub fn delta(&self) -> StatDelta {
        StatDelta::new(self.stat, self.value)
    }

    /// Human-readable line, e.g. "Boss Monster Damage +20%"
    pub fn describe(&self) -> String {
        let suffix = if self.stat.is_percent() { "%" } else { "" };
        let prime = if self.prime { " (Prime)" } else { "" };
        format!("{} +{}{}{}", self.stat.label(), self.value, suffix, prime)
    }
}

/// Options for one line position at one rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTable {
    pub rarity: Rarity,
    /// Line position, 1 to 3
    pub line: u8,
    pub options: Vec<StatLineOption>,
}

/// Rarity x line position catalog (inner ability, artifact and potential
/// tables all share this shape)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineCatalog {
    #[serde(default)]
    pub lines: Vec<LineTable>,
}

impl LineCatalog {
    /// Options at a rarity and line position, in catalog order
    pub fn options(&self, rarity: Rarity, line: u8) -> impl Iterator<Item = &StatLineOption> {
        self.lines
            .iter()
            .filter(move |t| t.rarity == rarity && t.line == line)
            .flat_map(|t| t.options.iter())
    }

    /// Rarities present in the catalog, lowest first
    pub fn rarities(&self) -> Vec<Rarity> {
        let mut rarities: Vec<Rarity> = self.lines.iter().map(|t| t.rarity).collect();
        rarities.sort();
        rarities.dedup();
        rarities
    }
}
