//! Exhaustive ranking of single lines and small line combinations

use crate::adjust::StatAdjuster;
use crate::damage::{DpsGain, Scorer};
use crate::lines::{LineCatalog, StatLineOption};
use crate::types::{Rarity, StatDelta};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Most lines a single item carries
pub const MAX_LINES: usize = 3;

/// One catalog line scored on its own against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLine {
    pub description: String,
    pub rarity: Rarity,
    pub line: u8,
    pub value: f64,
    pub boss_dps_gain: f64,
    pub normal_dps_gain: f64,
    pub avg_dps_gain: f64,
    pub percent_change: f64,
}

impl RankedLine {
    fn new(option: &StatLineOption, rarity: Rarity, line: u8, gain: DpsGain) -> Self {
        RankedLine {
            description: option.describe(),
            rarity,
            line,
            value: option.value,
            boss_dps_gain: gain.boss_dps_gain,
            normal_dps_gain: gain.normal_dps_gain,
            avg_dps_gain: gain.avg_dps_gain,
            percent_change: gain.percent_change,
        }
    }
}

/// Score every (rarity, line position, option) of a catalog independently.
///
/// Only strictly positive average gains are kept. The sort is stable, so
/// equal gains stay in catalog order.
pub fn rank_lines(
    catalog: &LineCatalog,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
) -> Vec<RankedLine> {
    let mut ranked = Vec::new();

    for table in &catalog.lines {
        for option in &table.options {
            if !option.is_well_formed() {
                warn!(
                    rarity = %table.rarity,
                    line = table.line,
                    stat = option.stat.key(),
                    "skipping malformed line option"
                );
                continue;
            }
            let stats = adjuster.adjust(scorer.base(), option.stat, option.value);
            let gain = scorer.compare(&stats);
            if gain.avg_dps_gain > 0.0 {
                ranked.push(RankedLine::new(option, table.rarity, table.line, gain));
            }
        }
    }

    ranked.sort_by(|a, b| b.avg_dps_gain.total_cmp(&a.avg_dps_gain));
    ranked
}

/// A set of concurrent lines, one per line position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCombination {
    pub rarity: Rarity,
    pub descriptions: Vec<String>,
    pub deltas: Vec<StatDelta>,
    pub gain: DpsGain,
}

impl RankedCombination {
    pub fn description(&self) -> String {
        self.descriptions.join(" / ")
    }
}

/// Best combinations of `lines` concurrent lines (positions 1 to `lines`)
/// at one rarity, by average DPS gain. Keeps the `top_n` best positive
/// combinations.
pub fn best_combinations(
    catalog: &LineCatalog,
    rarity: Rarity,
    lines: usize,
    top_n: usize,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
) -> Vec<RankedCombination> {
    let lines = if (1..=MAX_LINES).contains(&lines) {
        lines
    } else {
        warn!(lines, "line count outside 1..=3, clamping");
        lines.clamp(1, MAX_LINES)
    };

    let positions: Vec<Vec<&StatLineOption>> = (1..=lines as u8)
        .map(|line| {
            catalog
                .options(rarity, line)
                .filter(|o| o.is_well_formed())
                .collect()
        })
        .collect();
    if positions.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut ranked = Vec::new();
    let mut picks = vec![0usize; positions.len()];
    loop {
        let chosen: Vec<&StatLineOption> = positions
            .iter()
            .zip(&picks)
            .map(|(options, &i)| options[i])
            .collect();
        let deltas: Vec<StatDelta> = chosen.iter().map(|o| o.delta()).collect();
        let gain = scorer.compare(&adjuster.apply_all(scorer.base(), &deltas));
        if gain.avg_dps_gain > 0.0 {
            ranked.push(RankedCombination {
                rarity,
                descriptions: chosen.iter().map(|o| o.describe()).collect(),
                deltas,
                gain,
            });
        }

        // Odometer over the option indices, last position fastest
        let mut position = positions.len();
        loop {
            if position == 0 {
                ranked.sort_by(|a: &RankedCombination, b: &RankedCombination| {
                    b.gain.avg_dps_gain.total_cmp(&a.gain.avg_dps_gain)
                });
                ranked.truncate(top_n);
                return ranked;
            }
            position -= 1;
            picks[position] += 1;
            if picks[position] < positions[position].len() {
                break;
            }
            picks[position] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::{EnemyProfile, Objective};
    use crate::lines::LineTable;
    use crate::stat_vector::StatVector;
    use crate::types::StatKind;

    fn scorer() -> Scorer {
        let base = StatVector {
            attack: 1000.0,
            skill_coefficient: 100.0,
            min_damage: 100.0,
            max_damage: 100.0,
            ..Default::default()
        };
        Scorer::new(base, EnemyProfile::default(), Objective::Average)
    }

    fn catalog() -> LineCatalog {
        LineCatalog {
            lines: vec![
                LineTable {
                    rarity: Rarity::Epic,
                    line: 1,
                    options: vec![
                        StatLineOption::new(StatKind::Damage, 5.0),
                        StatLineOption::new(StatKind::BossDamage, 20.0),
                        StatLineOption::new(StatKind::Defense, 100.0),
                        StatLineOption::new(StatKind::NormalDamage, 20.0),
                    ],
                },
                LineTable {
                    rarity: Rarity::Epic,
                    line: 2,
                    options: vec![
                        StatLineOption::new(StatKind::Attack, 50.0),
                        StatLineOption::new(StatKind::Damage, f64::INFINITY),
                        StatLineOption::new(StatKind::Damage, 10.0),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_rank_lines_order_and_filter() {
        let ranked = rank_lines(&catalog(), &scorer(), &StatAdjuster::default());
        let descriptions: Vec<&str> = ranked.iter().map(|r| r.description.as_str()).collect();
        // Boss and normal +20% each average to +10%, tied with damage +10%:
        // ties keep catalog order. Defense does nothing and is dropped.
        assert_eq!(
            descriptions,
            vec![
                "Boss Monster Damage +20%",
                "Normal Monster Damage +20%",
                "Damage +10%",
                "Damage +5%",
                "Attack +50",
            ]
        );
        assert!(ranked
            .windows(2)
            .all(|w| w[0].avg_dps_gain >= w[1].avg_dps_gain));
        assert!((ranked[0].boss_dps_gain - 200.0).abs() < 1e-9);
        assert_eq!(ranked[0].normal_dps_gain, 0.0);
        assert!((ranked[0].percent_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_combinations() {
        let best = best_combinations(
            &catalog(),
            Rarity::Epic,
            2,
            3,
            &scorer(),
            &StatAdjuster::default(),
        );
        assert_eq!(best.len(), 3);
        // Boss +20% with damage +10%: boss 1320, normal 1100, average +210
        assert_eq!(best[0].description(), "Boss Monster Damage +20% / Damage +10%");
        assert_eq!(best[1].description(), "Normal Monster Damage +20% / Damage +10%");
        assert!((best[0].gain.avg_dps_gain - 210.0).abs() < 1e-9);
        assert_eq!(best[0].deltas.len(), 2);
        assert!(best
            .windows(2)
            .all(|w| w[0].gain.avg_dps_gain >= w[1].gain.avg_dps_gain));
    }

    #[test]
    fn test_best_combinations_missing_position() {
        let best = best_combinations(
            &catalog(),
            Rarity::Epic,
            3,
            10,
            &scorer(),
            &StatAdjuster::default(),
        );
        assert!(best.is_empty());
    }
}
