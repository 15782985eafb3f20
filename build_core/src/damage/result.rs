//! DamageResult - Read-only breakdown of a damage calculation

use crate::types::MonsterClass;
use serde::{Deserialize, Serialize};

/// What a hit is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub monster: MonsterClass,
    /// Enemy defense before penetration
    #[serde(default)]
    pub defense: f64,
}

impl Target {
    pub fn boss(defense: f64) -> Self {
        Target {
            monster: MonsterClass::Boss,
            defense,
        }
    }

    pub fn normal(defense: f64) -> Self {
        Target {
            monster: MonsterClass::Normal,
            defense,
        }
    }
}

/// Min / average / max of a damage roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl DamageRange {
    pub(crate) fn new(min: f64, max: f64) -> Self {
        DamageRange {
            min,
            avg: (min + max) / 2.0,
            max,
        }
    }

    pub(crate) fn scaled(&self, factor: f64) -> Self {
        DamageRange {
            min: self.min * factor,
            avg: self.avg * factor,
            max: self.max * factor,
        }
    }
}

/// Output of [`compute_damage`](super::compute_damage)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Attack scaled by skill coefficient and mastery
    pub base_damage: f64,
    /// Base damage after every multiplier, before the min/max roll
    pub base_hit_damage: f64,
    pub non_crit: DamageRange,
    pub crit: DamageRange,
    /// Crit-rate-weighted average damage per hit
    pub expected_damage: f64,
    pub dps: f64,

    // === Intermediates (diagnostics) ===
    pub damage_reduction: f64,
    pub damage_amp_multiplier: f64,
    pub attack_speed_multiplier: f64,
    pub final_damage_multiplier: f64,
}
