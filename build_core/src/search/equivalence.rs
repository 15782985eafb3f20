//! Stat equivalence table - what one point of each stat is worth

use crate::adjust::StatAdjuster;
use crate::damage::Scorer;
use crate::types::StatKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatEquivalent {
    pub stat: StatKind,
    /// Objective DPS gain (percent of baseline) from +1 of the stat
    pub gain_per_unit: f64,
    /// Points of the stat worth the same as +1% attack; `None` when the
    /// stat does not raise DPS
    pub units_per_attack_percent: Option<f64>,
}

/// Marginal value of +1 of every stat at the scorer's baseline
pub fn stat_equivalents(scorer: &Scorer, adjuster: &StatAdjuster) -> Vec<StatEquivalent> {
    let base = scorer.base();
    let one_percent_attack = adjuster.adjust(base, StatKind::Attack, base.attack / 100.0);
    let attack_percent_gain = scorer.gain_percent(&one_percent_attack);

    StatKind::ALL
        .iter()
        .map(|&stat| {
            let gain_per_unit = scorer.gain_percent(&adjuster.adjust(base, stat, 1.0));
            let units_per_attack_percent = (gain_per_unit > 0.0 && attack_percent_gain > 0.0)
                .then(|| attack_percent_gain / gain_per_unit);
            StatEquivalent {
                stat,
                gain_per_unit,
                units_per_attack_percent,
            }
        })
        .collect()
}
