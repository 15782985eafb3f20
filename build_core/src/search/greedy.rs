//! Greedy multi-slot line search
//!
//! Builds a set of lines one pick at a time: every step scores each unused
//! candidate against the *current* cumulative vector and commits the best
//! marginal gain. Scoring against the running vector captures diminishing
//! returns such as main stat % compounding, but the result is a heuristic:
//! a locally best pick can crowd out a better overall set.
//!
//! Picks respect how lines actually roll: a slot holds one rarity and at most
//! one option per line position. Candidates without a slot (inner ability
//! lines) share a single such group.

use super::exhaustive::MAX_LINES;
use crate::adjust::StatAdjuster;
use crate::cube::CubeCatalog;
use crate::damage::{DpsGain, Scorer};
use crate::lines::{LineCatalog, StatLineOption};
use crate::stat_vector::StatVector;
use crate::types::{Rarity, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One line that can be committed, optionally tied to a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyCandidate {
    pub slot: Option<SlotId>,
    pub rarity: Rarity,
    pub line: u8,
    pub option: StatLineOption,
}

impl GreedyCandidate {
    /// Every option of a line catalog, not tied to any slot
    pub fn from_line_catalog(catalog: &LineCatalog) -> Vec<GreedyCandidate> {
        catalog
            .lines
            .iter()
            .flat_map(|table| {
                table.options.iter().map(move |option| GreedyCandidate {
                    slot: None,
                    rarity: table.rarity,
                    line: table.line,
                    option: option.clone(),
                })
            })
            .collect()
    }

    /// Every (slot, rarity, line position, option) a cube catalog can roll
    pub fn from_cube_catalog(catalog: &CubeCatalog) -> Vec<GreedyCandidate> {
        let mut candidates = Vec::new();
        for slot in &catalog.slots {
            for tier in &catalog.tiers {
                for line in 1..=MAX_LINES as u8 {
                    for option in catalog.options_for(slot, tier.rarity, line) {
                        candidates.push(GreedyCandidate {
                            slot: Some(slot.clone()),
                            rarity: tier.rarity,
                            line,
                            option: option.clone(),
                        });
                    }
                }
            }
        }
        candidates
    }

    pub fn describe(&self) -> String {
        match &self.slot {
            Some(slot) => format!("{} {}: {}", slot, self.rarity, self.option.describe()),
            None => format!("{}: {}", self.rarity, self.option.describe()),
        }
    }
}

/// One independent greedy pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyScenario {
    pub name: String,
    /// Candidate rarity pool; empty allows every rarity
    #[serde(default)]
    pub allowed_rarities: Vec<Rarity>,
    /// Lines to add in total
    pub max_lines: usize,
}

impl GreedyScenario {
    pub fn new(name: &str, allowed_rarities: &[Rarity], max_lines: usize) -> Self {
        GreedyScenario {
            name: name.to_string(),
            allowed_rarities: allowed_rarities.to_vec(),
            max_lines,
        }
    }

    fn allows(&self, rarity: Rarity) -> bool {
        self.allowed_rarities.is_empty() || self.allowed_rarities.contains(&rarity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyPick {
    pub step: usize,
    pub slot: Option<SlotId>,
    pub rarity: Rarity,
    pub line: u8,
    pub description: String,
    /// Objective DPS gain of this pick on top of the earlier ones (percent
    /// of baseline)
    pub marginal_gain: f64,
    /// Objective DPS gain of every pick so far (percent of baseline)
    pub cumulative_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyResult {
    pub scenario: String,
    pub picks: Vec<GreedyPick>,
    pub final_stats: StatVector,
    pub total: DpsGain,
}

/// Lines committed to one slot so far
#[derive(Debug, Default)]
struct SlotFill {
    rarity: Option<Rarity>,
    lines: Vec<u8>,
}

impl SlotFill {
    fn accepts(&self, candidate: &GreedyCandidate) -> bool {
        self.lines.len() < MAX_LINES
            && !self.lines.contains(&candidate.line)
            && self.rarity.map_or(true, |r| r == candidate.rarity)
    }

    fn commit(&mut self, candidate: &GreedyCandidate) {
        self.rarity = Some(candidate.rarity);
        self.lines.push(candidate.line);
    }
}

/// Run one greedy pass. Each candidate is used at most once. The first pick
/// on a slot fixes its rarity, and each line position is filled once; the
/// pass stops early once no candidate improves the objective.
pub fn greedy_search(
    candidates: &[GreedyCandidate],
    scenario: &GreedyScenario,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
) -> GreedyResult {
    let mut current = *scorer.base();
    let mut current_gain = 0.0;
    let mut used = vec![false; candidates.len()];
    let mut fills: HashMap<Option<&SlotId>, SlotFill> = HashMap::new();
    let mut picks = Vec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        if !candidate.option.is_well_formed() {
            warn!(candidate = %candidate.describe(), "skipping malformed candidate");
            used[i] = true;
        }
    }

    for step in 0..scenario.max_lines {
        let mut best: Option<(usize, StatVector, f64)> = None;

        for (i, candidate) in candidates.iter().enumerate() {
            if used[i] || !scenario.allows(candidate.rarity) {
                continue;
            }
            let open = fills
                .get(&candidate.slot.as_ref())
                .map_or(true, |fill| fill.accepts(candidate));
            if !open {
                continue;
            }

            let next = adjuster.adjust(&current, candidate.option.stat, candidate.option.value);
            let gain = scorer.gain_percent(&next);
            if best.as_ref().map_or(true, |(_, _, g)| gain > *g) {
                best = Some((i, next, gain));
            }
        }

        let Some((index, next, gain)) = best.filter(|(_, _, g)| *g > current_gain) else {
            debug!(scenario = %scenario.name, step, "no positive marginal gain left");
            break;
        };

        let candidate = &candidates[index];
        used[index] = true;
        fills
            .entry(candidate.slot.as_ref())
            .or_default()
            .commit(candidate);
        picks.push(GreedyPick {
            step,
            slot: candidate.slot.clone(),
            rarity: candidate.rarity,
            line: candidate.line,
            description: candidate.describe(),
            marginal_gain: gain - current_gain,
            cumulative_gain: gain,
        });
        current = next;
        current_gain = gain;
    }

    GreedyResult {
        scenario: scenario.name.clone(),
        picks,
        total: scorer.compare(&current),
        final_stats: current,
    }
}

/// Independent greedy passes, one per scenario
pub fn run_scenarios(
    candidates: &[GreedyCandidate],
    scenarios: &[GreedyScenario],
    scorer: &Scorer,
    adjuster: &StatAdjuster,
) -> Vec<GreedyResult> {
    scenarios
        .iter()
        .map(|scenario| greedy_search(candidates, scenario, scorer, adjuster))
        .collect()
}
