//! Damage calculation - turning a stat vector into a DamageResult

use super::constants::{ATTACK_SPEED_CAP, CRIT_RATE_CAP, DEFENSE_CONSTANT};
use super::{DamageRange, DamageResult, Target};
use crate::stat_vector::StatVector;
use crate::types::MonsterClass;

/// Damage multiplier left after enemy defense
///
/// `C / (C + effective_defense)`: 1.0 at zero defense, approaching but never
/// reaching 0 as defense grows. Effective defense is floored at 0.
pub fn damage_reduction_factor(defense: f64, def_pen: f64) -> f64 {
    let effective = (defense * (1.0 - def_pen / 100.0)).max(0.0);
    DEFENSE_CONSTANT / (DEFENSE_CONSTANT + effective)
}

/// Calculate the expected damage and DPS of a stat vector against a target
///
/// Pure and deterministic. Any finite vector is accepted; zero or negative
/// stats simply produce smaller (or zero) damage.
pub fn compute_damage(stats: &StatVector, target: &Target) -> DamageResult {
    let is_boss = target.monster == MonsterClass::Boss;

    // Step 1: Skill base damage
    let total_mastery = stats.skill_mastery
        + if is_boss {
            stats.skill_mastery_boss
        } else {
            0.0
        };
    let base_damage =
        stats.attack * (stats.skill_coefficient / 100.0) * (1.0 + total_mastery / 100.0);

    // Step 2: Multiplier chain
    let monster_damage = if is_boss {
        stats.boss_damage
    } else {
        stats.normal_damage
    };
    let damage_reduction = damage_reduction_factor(target.defense, stats.def_pen);
    let damage_amp_multiplier = 1.0 + stats.damage_amp / 100.0;
    let final_damage_multiplier = 1.0 + stats.final_damage / 100.0;

    let base_hit_damage = base_damage
        * (1.0 + stats.stat_damage / 100.0)
        * (1.0 + stats.damage / 100.0)
        * (1.0 + monster_damage / 100.0)
        * damage_amp_multiplier
        * damage_reduction
        * final_damage_multiplier;

    // Step 3: Damage roll range (min is never allowed above max)
    let min_mult = stats.min_damage.min(stats.max_damage);
    let non_crit = DamageRange::new(
        base_hit_damage * (min_mult / 100.0),
        base_hit_damage * (stats.max_damage / 100.0),
    );
    let crit = non_crit.scaled(1.0 + stats.crit_damage / 100.0);

    // Step 4: Expected damage per hit
    let crit_chance = stats.crit_rate.clamp(0.0, CRIT_RATE_CAP) / 100.0;
    let expected_damage = non_crit.avg * (1.0 - crit_chance) + crit.avg * crit_chance;

    // Step 5: Attack speed
    let attack_speed_multiplier = 1.0 + stats.attack_speed.clamp(0.0, ATTACK_SPEED_CAP) / 100.0;

    DamageResult {
        base_damage,
        base_hit_damage,
        non_crit,
        crit,
        expected_damage,
        dps: expected_damage * attack_speed_multiplier,
        damage_reduction,
        damage_amp_multiplier,
        attack_speed_multiplier,
        final_damage_multiplier,
    }
}
