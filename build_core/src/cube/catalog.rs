//! Cube catalog - rarity ladder and rollable lines per slot

use crate::config::ConfigError;
use crate::lines::{LineTable, StatLineOption};
use crate::types::{Rarity, SlotId};
use serde::{Deserialize, Serialize};

/// Promotion odds out of one rarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityTier {
    pub rarity: Rarity,
    /// Chance per cube to move up one rarity (percentage points)
    #[serde(default)]
    pub promotion_rate: f64,
    /// Promotion is guaranteed after this many cubes at the tier
    #[serde(default)]
    pub pity: Option<u32>,
}

/// Lines that only roll on one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotLineTable {
    pub slot: SlotId,
    pub rarity: Rarity,
    pub line: u8,
    pub options: Vec<StatLineOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeCatalog {
    /// Slots in simulation order
    pub slots: Vec<SlotId>,
    #[serde(default = "default_starting_rarity")]
    pub starting_rarity: Rarity,
    pub tiers: Vec<RarityTier>,
    /// Lines available on every slot (subject to each option's own slot list)
    #[serde(default)]
    pub lines: Vec<LineTable>,
    #[serde(default)]
    pub slot_lines: Vec<SlotLineTable>,
}

fn default_starting_rarity() -> Rarity {
    Rarity::Rare
}

impl CubeCatalog {
    pub fn tier(&self, rarity: Rarity) -> Option<&RarityTier> {
        self.tiers.iter().find(|t| t.rarity == rarity)
    }

    /// Every option that can roll on `slot` at `rarity` and line position
    /// `line` (1-based): rarity-global options first, then slot-only ones
    pub fn options_for<'a>(
        &'a self,
        slot: &'a SlotId,
        rarity: Rarity,
        line: u8,
    ) -> impl Iterator<Item = &'a StatLineOption> + 'a {
        let global = self
            .lines
            .iter()
            .filter(move |t| t.rarity == rarity && t.line == line)
            .flat_map(|t| t.options.iter())
            .filter(move |o| o.allows(slot));
        let specific = self
            .slot_lines
            .iter()
            .filter(move |t| &t.slot == slot && t.rarity == rarity && t.line == line)
            .flat_map(|t| t.options.iter());
        global.chain(specific)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::ValidationError(
                "cube catalog needs at least one slot".to_string(),
            ));
        }
        if self.tier(self.starting_rarity).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "starting rarity {} has no tier entry",
                self.starting_rarity
            )));
        }
        for tier in &self.tiers {
            if !(0.0..=100.0).contains(&tier.promotion_rate) {
                return Err(ConfigError::ValidationError(format!(
                    "{} promotion rate {} is outside [0, 100]",
                    tier.rarity, tier.promotion_rate
                )));
            }
            if tier.pity == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "{} pity must be at least 1",
                    tier.rarity
                )));
            }
            let promotes = tier.promotion_rate > 0.0 || tier.pity.is_some();
            if let Some(next) = tier.rarity.next().filter(|_| promotes) {
                if self.tier(next).is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "{} promotes to {} which has no tier entry",
                        tier.rarity, next
                    )));
                }
            }
        }
        let lines = self
            .lines
            .iter()
            .map(|t| t.line)
            .chain(self.slot_lines.iter().map(|t| t.line));
        for line in lines {
            if !(1..=3).contains(&line) {
                return Err(ConfigError::ValidationError(format!(
                    "line position {line} is outside 1..=3"
                )));
            }
        }
        Ok(())
    }
}
