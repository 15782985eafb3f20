//! DPS gain scoring against a fixed baseline

use super::{compute_damage, Target};
use crate::stat_vector::StatVector;
use serde::{Deserialize, Serialize};

/// Enemy defenses used when scoring against boss and normal monsters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    pub boss_defense: f64,
    pub normal_defense: f64,
}

impl EnemyProfile {
    pub fn boss(&self) -> Target {
        Target::boss(self.boss_defense)
    }

    pub fn normal(&self) -> Target {
        Target::normal(self.normal_defense)
    }
}

/// Which DPS figure the optimizers maximise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Boss,
    Normal,
    /// Mean of boss and normal DPS
    #[default]
    Average,
}

/// Difference between a candidate vector and the baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DpsGain {
    pub boss_dps_gain: f64,
    pub normal_dps_gain: f64,
    pub avg_dps_gain: f64,
    /// Percent change of the scorer's objective DPS
    pub percent_change: f64,
}

/// Scores stat vectors against a baseline computed once up front
#[derive(Debug, Clone)]
pub struct Scorer {
    base: StatVector,
    enemies: EnemyProfile,
    objective: Objective,
    base_boss_dps: f64,
    base_normal_dps: f64,
}

impl Scorer {
    pub fn new(base: StatVector, enemies: EnemyProfile, objective: Objective) -> Self {
        let base_boss_dps = compute_damage(&base, &enemies.boss()).dps;
        let base_normal_dps = compute_damage(&base, &enemies.normal()).dps;
        Scorer {
            base,
            enemies,
            objective,
            base_boss_dps,
            base_normal_dps,
        }
    }

    pub fn base(&self) -> &StatVector {
        &self.base
    }

    pub fn enemies(&self) -> &EnemyProfile {
        &self.enemies
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Objective DPS of the baseline
    pub fn base_dps(&self) -> f64 {
        self.pick(self.base_boss_dps, self.base_normal_dps)
    }

    /// Objective DPS of a vector
    pub fn dps(&self, stats: &StatVector) -> f64 {
        match self.objective {
            Objective::Boss => compute_damage(stats, &self.enemies.boss()).dps,
            Objective::Normal => compute_damage(stats, &self.enemies.normal()).dps,
            Objective::Average => {
                let boss = compute_damage(stats, &self.enemies.boss()).dps;
                let normal = compute_damage(stats, &self.enemies.normal()).dps;
                (boss + normal) / 2.0
            }
        }
    }

    /// Percent change of objective DPS relative to the baseline (0 if the
    /// baseline does no damage)
    pub fn gain_percent(&self, stats: &StatVector) -> f64 {
        percent_of(self.dps(stats) - self.base_dps(), self.base_dps())
    }

    /// Full boss / normal / average comparison
    pub fn compare(&self, stats: &StatVector) -> DpsGain {
        let boss = compute_damage(stats, &self.enemies.boss()).dps;
        let normal = compute_damage(stats, &self.enemies.normal()).dps;
        let boss_dps_gain = boss - self.base_boss_dps;
        let normal_dps_gain = normal - self.base_normal_dps;

        DpsGain {
            boss_dps_gain,
            normal_dps_gain,
            avg_dps_gain: (boss_dps_gain + normal_dps_gain) / 2.0,
            percent_change: percent_of(
                self.pick(boss_dps_gain, normal_dps_gain),
                self.base_dps(),
            ),
        }
    }

    fn pick(&self, boss: f64, normal: f64) -> f64 {
        match self.objective {
            Objective::Boss => boss,
            Objective::Normal => normal,
            Objective::Average => (boss + normal) / 2.0,
        }
    }
}

fn percent_of(delta: f64, base: f64) -> f64 {
    if base > 0.0 {
        delta / base * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StatVector {
        StatVector {
            attack: 1000.0,
            skill_coefficient: 100.0,
            min_damage: 100.0,
            max_damage: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_gain_of_baseline_is_zero() {
        let scorer = Scorer::new(base(), EnemyProfile::default(), Objective::Average);
        let gain = scorer.compare(&base());
        assert_eq!(gain.avg_dps_gain, 0.0);
        assert_eq!(scorer.gain_percent(&base()), 0.0);
    }

    #[test]
    fn test_boss_damage_only_helps_boss() {
        let scorer = Scorer::new(base(), EnemyProfile::default(), Objective::Average);
        let mut candidate = base();
        candidate.boss_damage = 10.0;

        let gain = scorer.compare(&candidate);
        assert!((gain.boss_dps_gain - 100.0).abs() < 1e-9);
        assert_eq!(gain.normal_dps_gain, 0.0);
        assert!((gain.avg_dps_gain - 50.0).abs() < 1e-9);
        assert!((gain.percent_change - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_objective_selects_figure() {
        let mut candidate = base();
        candidate.normal_damage = 20.0;
        let boss = Scorer::new(base(), EnemyProfile::default(), Objective::Boss);
        let normal = Scorer::new(base(), EnemyProfile::default(), Objective::Normal);
        assert_eq!(boss.gain_percent(&candidate), 0.0);
        assert!((normal.gain_percent(&candidate) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline_has_zero_percent() {
        let scorer = Scorer::new(StatVector::zero(), EnemyProfile::default(), Objective::Average);
        assert_eq!(scorer.gain_percent(&base()), 0.0);
    }
}
