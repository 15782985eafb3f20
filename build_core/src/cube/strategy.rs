//! Cube strategies - which slot receives the next cube

use crate::types::Rarity;
use serde::{Deserialize, Serialize};

/// What a strategy sees of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotView {
    pub index: usize,
    /// DPS gain in percent of the slot's lines alone
    pub gain: f64,
    pub rarity: Rarity,
    /// 0.0 to 1.0 progress toward a guaranteed promotion; 0 without pity
    pub promotion_progress: f64,
    pub cubes_used: u32,
}

pub trait SlotPolicy {
    fn name(&self) -> String;

    /// Index into `slots` for the next cube. `slots` is never empty.
    fn choose_slot(&self, slots: &[SlotView]) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CubeStrategy {
    /// Lowest gain first, ties to the first slot
    WorstFirst,
    /// Furthest below the cross-slot average
    BelowAverage,
    /// Worst-first, pulled toward slots close to a pity promotion
    PromotionProximity { weight: f64 },
    /// Every slot to `target` rarity first, then worst-first
    RushRarity { target: Rarity },
}

impl CubeStrategy {
    pub fn standard_set() -> Vec<CubeStrategy> {
        vec![
            CubeStrategy::WorstFirst,
            CubeStrategy::BelowAverage,
            CubeStrategy::PromotionProximity { weight: 1.0 },
            CubeStrategy::RushRarity {
                target: Rarity::Legendary,
            },
        ]
    }
}

/// Index of the highest score; ties keep the earliest slot
fn best_by<F>(slots: &[SlotView], score: F) -> usize
where
    F: Fn(&SlotView) -> f64,
{
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, slot) in slots.iter().enumerate() {
        let s = score(slot);
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    best
}

fn worst_first(slots: &[SlotView]) -> usize {
    best_by(slots, |s| -s.gain)
}

fn below_average(slots: &[SlotView]) -> usize {
    let average = slots.iter().map(|s| s.gain).sum::<f64>() / slots.len().max(1) as f64;
    let mut best = 0;
    for (i, slot) in slots.iter().enumerate().skip(1) {
        let current = &slots[best];
        let deficit = average - slot.gain;
        let best_deficit = average - current.gain;
        if deficit > best_deficit || (deficit == best_deficit && slot.cubes_used < current.cubes_used)
        {
            best = i;
        }
    }
    best
}

fn promotion_proximity(slots: &[SlotView], weight: f64) -> usize {
    let (low, high) = slots
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.gain), hi.max(s.gain))
        });
    let spread = high - low;
    best_by(slots, |s| {
        let relative = if spread > 0.0 {
            (s.gain - low) / spread
        } else {
            0.0
        };
        weight * s.promotion_progress - relative
    })
}

fn rush_rarity(slots: &[SlotView], target: Rarity) -> usize {
    let lagging = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.rarity < target)
        .min_by_key(|(_, s)| s.rarity);
    match lagging {
        Some((i, _)) => i,
        None => worst_first(slots),
    }
}

impl SlotPolicy for CubeStrategy {
    fn name(&self) -> String {
        match self {
            CubeStrategy::WorstFirst => "worst first".to_string(),
            CubeStrategy::BelowAverage => "below average".to_string(),
            CubeStrategy::PromotionProximity { weight } => {
                format!("promotion proximity (x{weight})")
            }
            CubeStrategy::RushRarity { target } => format!("rush to {target}, then worst first"),
        }
    }

    fn choose_slot(&self, slots: &[SlotView]) -> usize {
        match *self {
            CubeStrategy::WorstFirst => worst_first(slots),
            CubeStrategy::BelowAverage => below_average(slots),
            CubeStrategy::PromotionProximity { weight } => promotion_proximity(slots, weight),
            CubeStrategy::RushRarity { target } => rush_rarity(slots, target),
        }
    }
}
