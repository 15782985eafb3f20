//! StatAdjuster - Applying a named stat delta with the right algebra
//!
//! Most stats add. Final damage compounds multiplicatively, attack speed and
//! defense penetration compound toward a cap, and main stat / main stat % /
//! defense convert into stat damage and attack.

mod algebra;

pub use algebra::{compound, diminish, uncompound, undiminish};

use crate::config::GameConstants;
use crate::stat_vector::StatVector;
use crate::types::{StatAlgebra, StatDelta, StatKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Diminishing-returns factor for attack speed
pub const ATTACK_SPEED_FACTOR: f64 = 150.0;

/// Diminishing-returns factor for defense penetration
pub const DEF_PEN_FACTOR: f64 = 100.0;

/// Main stat needed for 1% stat damage
pub const MAIN_STAT_PER_STAT_DAMAGE: f64 = 100.0;

/// Class-dependent conversion rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassContext {
    /// Selected class name, if any
    pub class: Option<String>,
    /// Attack gained per point of main stat, before weapon bonus
    pub attack_per_main_stat: f64,
    /// Weapon attack bonus (percentage points) applied to converted attack
    pub weapon_attack_bonus: f64,
    /// Main stat gained per point of defense (0 for most classes)
    pub defense_to_main_stat: f64,
}

impl ClassContext {
    /// Resolve the selected class against the class table.
    /// Unknown or missing classes fall back to the table defaults.
    pub fn resolve(
        constants: &GameConstants,
        class: Option<&str>,
        weapon_attack_bonus: f64,
    ) -> ClassContext {
        let entry = class.and_then(|name| constants.class(name));
        if let (Some(name), None) = (class, entry) {
            warn!(class = name, "unknown class, using default conversions");
        }

        ClassContext {
            class: class.map(str::to_string),
            attack_per_main_stat: entry
                .map(|c| c.attack_per_main_stat)
                .unwrap_or(constants.default_attack_per_main_stat),
            weapon_attack_bonus,
            defense_to_main_stat: entry.map(|c| c.defense_to_main_stat).unwrap_or(0.0),
        }
    }

    /// Attack gained from one point of main stat
    pub fn attack_per_main_stat(&self) -> f64 {
        self.attack_per_main_stat * (1.0 + self.weapon_attack_bonus / 100.0)
    }
}

/// Applies stat deltas to vectors, returning new vectors
#[derive(Debug, Clone, Default)]
pub struct StatAdjuster {
    context: ClassContext,
}

impl StatAdjuster {
    pub fn new(context: ClassContext) -> Self {
        StatAdjuster { context }
    }

    pub fn context(&self) -> &ClassContext {
        &self.context
    }

    /// Add `delta` of `stat`
    pub fn adjust(&self, stats: &StatVector, stat: StatKind, delta: f64) -> StatVector {
        let mut next = *stats;
        let old = stats.get(stat);

        match stat.algebra() {
            StatAlgebra::Additive => next.set(stat, old + delta),
            StatAlgebra::Multiplicative => next.set(stat, compound(old, delta)),
            StatAlgebra::Diminishing { factor } => next.set(stat, diminish(old, delta, factor)),
            StatAlgebra::MainStat => self.add_main_stat(&mut next, delta),
            StatAlgebra::MainStatPercent => self.add_main_stat_percent(&mut next, delta),
            StatAlgebra::Defense => self.add_defense(&mut next, delta),
        }

        next
    }

    /// Remove `delta` of `stat` previously added with [`adjust`](Self::adjust)
    pub fn subtract(&self, stats: &StatVector, stat: StatKind, delta: f64) -> StatVector {
        let current = stats.get(stat);

        match stat.algebra() {
            StatAlgebra::Multiplicative => stats.with(stat, uncompound(current, delta)),
            StatAlgebra::Diminishing { factor } => {
                stats.with(stat, undiminish(current, delta, factor))
            }
            // The additive and conversion rules are their own inverse under
            // negation: the main-stat% ratio for -delta is the reciprocal
            // of the ratio for +delta.
            _ => self.adjust(stats, stat, -delta),
        }
    }

    /// Apply a sequence of deltas in order
    pub fn apply_all(&self, stats: &StatVector, deltas: &[StatDelta]) -> StatVector {
        deltas
            .iter()
            .fold(*stats, |acc, d| self.adjust(&acc, d.stat, d.amount))
    }

    /// Flat main stat is scaled by the current main stat %
    fn add_main_stat(&self, stats: &mut StatVector, delta: f64) {
        let gained = delta * (1.0 + stats.main_stat_pct / 100.0);
        stats.main_stat += gained;
        self.convert_main_stat(stats, gained);
    }

    /// Main stat % is a ratio of multipliers against the % already present.
    ///
    /// The defense-derived part of main stat does not scale with %, so it is
    /// removed before scaling and left in place afterwards.
    fn add_main_stat_percent(&self, stats: &mut StatVector, delta: f64) {
        let current_pct = stats.main_stat_pct;
        let current_mult = 1.0 + current_pct / 100.0;
        if current_mult <= 0.0 {
            warn!(current_pct, "main stat % multiplier is not positive, skipping conversion");
            stats.main_stat_pct = current_pct + delta;
            return;
        }

        let defense_part = stats.defense * self.context.defense_to_main_stat;
        let mut scaling_part = stats.main_stat - defense_part;
        if scaling_part < 0.0 {
            warn!(
                main_stat = stats.main_stat,
                defense_part,
                "defense-derived main stat exceeds total main stat, nothing scales with %"
            );
            scaling_part = 0.0;
        }
        let ratio = (1.0 + (current_pct + delta) / 100.0) / current_mult;
        let gained = scaling_part * (ratio - 1.0);

        stats.main_stat_pct = current_pct + delta;
        stats.main_stat += gained;
        self.convert_main_stat(stats, gained);
    }

    /// Defense only matters for classes that convert it into main stat
    fn add_defense(&self, stats: &mut StatVector, delta: f64) {
        stats.defense += delta;
        if self.context.defense_to_main_stat > 0.0 {
            let gained = delta * self.context.defense_to_main_stat;
            stats.main_stat += gained;
            self.convert_main_stat(stats, gained);
        }
    }

    fn convert_main_stat(&self, stats: &mut StatVector, gained: f64) {
        stats.stat_damage += gained / MAIN_STAT_PER_STAT_DAMAGE;
        stats.attack += gained * self.context.attack_per_main_stat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warrior() -> ClassContext {
        ClassContext {
            class: Some("warrior".to_string()),
            attack_per_main_stat: 0.5,
            weapon_attack_bonus: 20.0,
            defense_to_main_stat: 0.0,
        }
    }

    fn guardian() -> ClassContext {
        ClassContext {
            class: Some("guardian".to_string()),
            attack_per_main_stat: 0.5,
            weapon_attack_bonus: 0.0,
            defense_to_main_stat: 0.1,
        }
    }

    fn stats() -> StatVector {
        StatVector {
            attack: 2000.0,
            crit_rate: 40.0,
            final_damage: 10.0,
            attack_speed: 30.0,
            def_pen: 20.0,
            defense: 5000.0,
            main_stat: 6000.0,
            main_stat_pct: 20.0,
            stat_damage: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_additive() {
        let adjuster = StatAdjuster::default();
        let next = adjuster.adjust(&stats(), StatKind::CritRate, 12.5);
        assert!((next.crit_rate - 52.5).abs() < 1e-12);
        assert!((stats().crit_rate - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_final_damage_compounds() {
        let adjuster = StatAdjuster::default();
        let next = adjuster.adjust(&stats(), StatKind::FinalDamage, 10.0);
        // 1.1 * 1.1 = 1.21
        assert!((next.final_damage - 21.0).abs() < 1e-9);
        let back = adjuster.subtract(&next, StatKind::FinalDamage, 10.0);
        assert!((back.final_damage - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_attack_speed_diminishes() {
        let adjuster = StatAdjuster::default();
        let next = adjuster.adjust(&stats(), StatKind::AttackSpeed, 30.0);
        assert!((next.attack_speed - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_main_stat_converts() {
        let adjuster = StatAdjuster::new(warrior());
        let next = adjuster.adjust(&stats(), StatKind::MainStat, 100.0);
        // 100 flat * 1.2 from main stat % = 120 main stat
        assert!((next.main_stat - 6120.0).abs() < 1e-9);
        // 120 / 100 = 1.2% stat damage
        assert!((next.stat_damage - 61.2).abs() < 1e-9);
        // 120 * 0.5 * 1.2 weapon bonus = 72 attack
        assert!((next.attack - 2072.0).abs() < 1e-9);
    }

    #[test]
    fn test_main_stat_percent_uses_current_percent() {
        let adjuster = StatAdjuster::new(warrior());
        let next = adjuster.adjust(&stats(), StatKind::MainStatPct, 10.0);
        // 6000 at 1.2 -> 6000 * 1.3 / 1.2 = 6500
        assert!((next.main_stat - 6500.0).abs() < 1e-9);
        assert!((next.main_stat_pct - 30.0).abs() < 1e-12);
        assert!((next.stat_damage - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_defense_portion_does_not_scale() {
        let adjuster = StatAdjuster::new(guardian());
        // 5000 defense * 0.1 = 500 main stat that ignores main stat %
        let next = adjuster.adjust(&stats(), StatKind::MainStatPct, 12.0);
        let expected_gain = 5500.0 * (1.32 / 1.2 - 1.0);
        assert!((next.main_stat - (6000.0 + expected_gain)).abs() < 1e-9);
    }

    #[test]
    fn test_defense_converts_only_for_gated_class() {
        let plain = StatAdjuster::new(warrior()).adjust(&stats(), StatKind::Defense, 1000.0);
        assert!((plain.main_stat - 6000.0).abs() < 1e-12);
        assert!((plain.defense - 6000.0).abs() < 1e-12);

        let converted = StatAdjuster::new(guardian()).adjust(&stats(), StatKind::Defense, 1000.0);
        assert!((converted.main_stat - 6100.0).abs() < 1e-9);
        assert!((converted.stat_damage - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_subtract_inverts_every_stat() {
        for context in [warrior(), guardian()] {
            let adjuster = StatAdjuster::new(context);
            for stat in StatKind::ALL {
                let added = adjuster.adjust(&stats(), stat, 7.5);
                let back = adjuster.subtract(&added, stat, 7.5);
                assert!(back.approx_eq(&stats(), 1e-9), "{stat:?} did not invert");
            }
        }
    }

    #[test]
    fn test_apply_all_chains_context() {
        let adjuster = StatAdjuster::new(warrior());
        let twice = adjuster.apply_all(
            &stats(),
            &[
                StatDelta::new(StatKind::MainStatPct, 10.0),
                StatDelta::new(StatKind::MainStatPct, 10.0),
            ],
        );
        let once = adjuster.adjust(&stats(), StatKind::MainStatPct, 20.0);
        assert!(twice.approx_eq(&once, 1e-9));
    }

    #[test]
    fn test_resolve_unknown_class_uses_defaults() {
        let constants = GameConstants::default();
        let context = ClassContext::resolve(&constants, Some("nobody"), 0.0);
        assert_eq!(context.defense_to_main_stat, 0.0);
        assert!(
            (context.attack_per_main_stat - constants.default_attack_per_main_stat).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_main_stat_percent_never_scales_below_defense_part() {
        // 5000 defense converts to 500 main stat, more than the 300 supplied
        let adjuster = StatAdjuster::new(guardian());
        let start = StatVector {
            main_stat: 300.0,
            ..stats()
        };
        let next = adjuster.adjust(&start, StatKind::MainStatPct, 10.0);
        assert!((next.main_stat_pct - 30.0).abs() < 1e-12);
        assert_eq!(next.main_stat, start.main_stat);
        assert_eq!(next.attack, start.attack);
        assert_eq!(next.stat_damage, start.stat_damage);

        let back = adjuster.subtract(&next, StatKind::MainStatPct, 10.0);
        assert!(back.approx_eq(&start, 1e-12));
    }
}
