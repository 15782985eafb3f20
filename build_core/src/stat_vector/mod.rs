//! StatVector - The full set of character combat stats at one point in time

mod inputs;

pub use inputs::InputIssue;

use crate::types::{StatDelta, StatKind};
use serde::{Deserialize, Serialize};

/// Character combat stats
///
/// Percentage stats are stored as raw percentage points (`12.5` means 12.5%).
/// Calculations never mutate a caller's vector: every transformation works on
/// a clone and hands the new vector back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatVector {
    // === Offense ===
    pub attack: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub stat_damage: f64,
    pub damage: f64,
    pub boss_damage: f64,
    pub normal_damage: f64,
    pub damage_amp: f64,
    pub min_damage: f64,
    pub max_damage: f64,
    pub attack_speed: f64,
    pub def_pen: f64,
    pub final_damage: f64,

    // === Skill ===
    pub skill_coefficient: f64,
    pub skill_mastery: f64,
    pub skill_mastery_boss: f64,

    // === Conversion sources ===
    pub defense: f64,
    pub main_stat: f64,
    pub main_stat_pct: f64,
}

impl StatVector {
    /// All stats zero
    pub fn zero() -> Self {
        StatVector::default()
    }

    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
            StatKind::StatDamage => self.stat_damage,
            StatKind::Damage => self.damage,
            StatKind::BossDamage => self.boss_damage,
            StatKind::NormalDamage => self.normal_damage,
            StatKind::DamageAmp => self.damage_amp,
            StatKind::MinDamage => self.min_damage,
            StatKind::MaxDamage => self.max_damage,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::DefPen => self.def_pen,
            StatKind::FinalDamage => self.final_damage,
            StatKind::SkillCoefficient => self.skill_coefficient,
            StatKind::SkillMastery => self.skill_mastery,
            StatKind::SkillMasteryBoss => self.skill_mastery_boss,
            StatKind::Defense => self.defense,
            StatKind::MainStat => self.main_stat,
            StatKind::MainStatPct => self.main_stat_pct,
        }
    }

    fn slot_mut(&mut self, stat: StatKind) -> &mut f64 {
        match stat {
            StatKind::Attack => &mut self.attack,
            StatKind::CritRate => &mut self.crit_rate,
            StatKind::CritDamage => &mut self.crit_damage,
            StatKind::StatDamage => &mut self.stat_damage,
            StatKind::Damage => &mut self.damage,
            StatKind::BossDamage => &mut self.boss_damage,
            StatKind::NormalDamage => &mut self.normal_damage,
            StatKind::DamageAmp => &mut self.damage_amp,
            StatKind::MinDamage => &mut self.min_damage,
            StatKind::MaxDamage => &mut self.max_damage,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::DefPen => &mut self.def_pen,
            StatKind::FinalDamage => &mut self.final_damage,
            StatKind::SkillCoefficient => &mut self.skill_coefficient,
            StatKind::SkillMastery => &mut self.skill_mastery,
            StatKind::SkillMasteryBoss => &mut self.skill_mastery_boss,
            StatKind::Defense => &mut self.defense,
            StatKind::MainStat => &mut self.main_stat,
            StatKind::MainStatPct => &mut self.main_stat_pct,
        }
    }

    /// Set a stat in place (only on vectors the caller owns locally)
    pub fn set(&mut self, stat: StatKind, value: f64) {
        *self.slot_mut(stat) = value;
    }

    /// Copy of this vector with one stat replaced
    pub fn with(&self, stat: StatKind, value: f64) -> StatVector {
        let mut next = *self;
        next.set(stat, value);
        next
    }

    /// Raw addition with no stat algebra. Used for reward accumulators,
    /// never for applying bonuses to a character (see `StatAdjuster`).
    pub fn add_raw(&mut self, delta: StatDelta) {
        *self.slot_mut(delta.stat) += delta.amount;
    }

    /// Iterate `(stat, value)` for every stat
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }

    /// Relative comparison of every stat, used by invertibility checks
    pub fn approx_eq(&self, other: &StatVector, rel_tolerance: f64) -> bool {
        self.iter().all(|(kind, a)| {
            let b = other.get(kind);
            let scale = a.abs().max(b.abs()).max(1.0);
            (a - b).abs() <= rel_tolerance * scale
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_cover_every_stat() {
        let mut v = StatVector::zero();
        for (i, kind) in StatKind::ALL.iter().enumerate() {
            v.set(*kind, i as f64 + 1.0);
        }
        for (i, kind) in StatKind::ALL.iter().enumerate() {
            assert!((v.get(*kind) - (i as f64 + 1.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let base = StatVector {
            attack: 100.0,
            ..Default::default()
        };
        let changed = base.with(StatKind::Attack, 250.0);
        assert!((base.attack - 100.0).abs() < f64::EPSILON);
        assert!((changed.attack - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_raw_accumulates() {
        let mut v = StatVector::zero();
        v.add_raw(StatDelta::new(StatKind::BossDamage, 10.0));
        v.add_raw(StatDelta::new(StatKind::BossDamage, 5.0));
        assert!((v.boss_damage - 15.0).abs() < f64::EPSILON);
        assert_eq!(v.iter().filter(|(_, value)| *value != 0.0).count(), 1);
    }

    #[test]
    fn test_deserialize_partial() {
        let v: StatVector = serde_json::from_str(r#"{"attack": 500, "crit_rate": 40}"#).unwrap();
        assert!((v.attack - 500.0).abs() < f64::EPSILON);
        assert!((v.crit_rate - 40.0).abs() < f64::EPSILON);
        assert!(v.final_damage.abs() < f64::EPSILON);
    }
}
