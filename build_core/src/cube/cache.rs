//! SimulationCache - resolved weighted line tables for one batch

use super::catalog::{CubeCatalog, RarityTier};
use crate::adjust::ClassContext;
use crate::stat_vector::StatVector;
use crate::types::{Rarity, SlotId, StatDelta};
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::{error, warn};

/// Fingerprint of the inputs a cache was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheStamp {
    inputs: u64,
    catalog: u64,
}

impl CacheStamp {
    pub fn new(base: &StatVector, context: &ClassContext, catalog: &CubeCatalog) -> Self {
        CacheStamp {
            inputs: inputs_hash(base, context),
            catalog: catalog_hash(catalog),
        }
    }
}

fn inputs_hash(base: &StatVector, context: &ClassContext) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (_, value) in base.iter() {
        value.to_bits().hash(&mut hasher);
    }
    context.class.hash(&mut hasher);
    context.attack_per_main_stat.to_bits().hash(&mut hasher);
    context.weapon_attack_bonus.to_bits().hash(&mut hasher);
    context.defense_to_main_stat.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn catalog_hash(catalog: &CubeCatalog) -> u64 {
    let mut hasher = DefaultHasher::new();
    serde_json::to_string(catalog)
        .unwrap_or_default()
        .hash(&mut hasher);
    hasher.finish()
}

/// One line position's weighted options
#[derive(Debug, Clone, Default)]
struct WeightedLine {
    deltas: Vec<StatDelta>,
    /// Running weight total, parallel to `deltas`
    cumulative: Vec<f64>,
}

impl WeightedLine {
    fn push(&mut self, delta: StatDelta, weight: f64) {
        let total = self.total() + weight;
        self.deltas.push(delta);
        self.cumulative.push(total);
    }

    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Option<StatDelta> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let target = rng.gen::<f64>() * total;
        let index = self.cumulative.partition_point(|&c| c <= target);
        self.deltas
            .get(index.min(self.deltas.len() - 1))
            .copied()
    }
}

/// Resolved tables for every (slot, rarity) pair of a catalog.
///
/// Build once per batch and rebuild whenever the base vector, class or
/// catalog changes; engines check the stamp in debug builds.
#[derive(Debug, Clone)]
pub struct SimulationCache {
    stamp: CacheStamp,
    slots: Vec<SlotId>,
    starting_rarity: Rarity,
    tiers: HashMap<Rarity, RarityTier>,
    lines: HashMap<(usize, Rarity), [WeightedLine; 3]>,
}

impl SimulationCache {
    pub fn build(base: &StatVector, context: &ClassContext, catalog: &CubeCatalog) -> Self {
        let mut lines = HashMap::new();

        for (slot_index, slot) in catalog.slots.iter().enumerate() {
            for tier in &catalog.tiers {
                let mut positions: [WeightedLine; 3] = Default::default();
                for (position, weighted) in positions.iter_mut().enumerate() {
                    let line = position as u8 + 1;
                    for option in catalog.options_for(slot, tier.rarity, line) {
                        if !option.is_well_formed() {
                            warn!(
                                slot = %slot,
                                rarity = %tier.rarity,
                                line,
                                stat = option.stat.key(),
                                "skipping malformed line option"
                            );
                            continue;
                        }
                        weighted.push(option.delta(), option.weight);
                    }
                }
                lines.insert((slot_index, tier.rarity), positions);
            }
        }

        SimulationCache {
            stamp: CacheStamp::new(base, context, catalog),
            slots: catalog.slots.clone(),
            starting_rarity: catalog.starting_rarity,
            tiers: catalog.tiers.iter().map(|t| (t.rarity, *t)).collect(),
            lines,
        }
    }

    /// Whether this cache was built from exactly these inputs
    pub fn is_current_for(
        &self,
        base: &StatVector,
        context: &ClassContext,
        catalog: &CubeCatalog,
    ) -> bool {
        self.stamp == CacheStamp::new(base, context, catalog)
    }

    /// Whether the base vector and class context match (catalog unchecked)
    pub fn matches_inputs(&self, base: &StatVector, context: &ClassContext) -> bool {
        self.stamp.inputs == inputs_hash(base, context)
    }

    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    pub fn starting_rarity(&self) -> Rarity {
        self.starting_rarity
    }

    pub fn tier(&self, rarity: Rarity) -> Option<&RarityTier> {
        self.tiers.get(&rarity)
    }

    /// Sum of option weights at a slot, rarity and 0-based line position
    pub fn weight_sum(&self, slot: usize, rarity: Rarity, position: usize) -> f64 {
        self.lines
            .get(&(slot, rarity))
            .and_then(|l| l.get(position))
            .map_or(0.0, WeightedLine::total)
    }

    /// Weighted draw for one line position. `None` when nothing can roll.
    pub fn draw<R: Rng>(
        &self,
        slot: usize,
        rarity: Rarity,
        position: usize,
        rng: &mut R,
    ) -> Option<StatDelta> {
        let Some(positions) = self.lines.get(&(slot, rarity)) else {
            debug_assert!(false, "no cached lines for slot {slot} at {rarity}");
            error!(slot, rarity = %rarity, "no cached lines, cache does not match the catalog");
            return None;
        };
        positions.get(position).and_then(|line| line.draw(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::catalog::RarityTier;
    use crate::lines::{LineTable, StatLineOption};
    use crate::types::StatKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> CubeCatalog {
        CubeCatalog {
            slots: vec![SlotId::from("gloves")],
            starting_rarity: Rarity::Epic,
            tiers: vec![RarityTier {
                rarity: Rarity::Epic,
                promotion_rate: 0.0,
                pity: None,
            }],
            lines: vec![LineTable {
                rarity: Rarity::Epic,
                line: 1,
                options: vec![
                    StatLineOption::new(StatKind::Damage, 6.0).with_weight(3.0),
                    StatLineOption::new(StatKind::BossDamage, 6.0).with_weight(1.0),
                    StatLineOption::new(StatKind::CritRate, 3.0).with_weight(f64::NAN),
                ],
            }],
            slot_lines: vec![],
        }
    }

    #[test]
    fn test_weight_sums_skip_malformed() {
        let cache = SimulationCache::build(&StatVector::zero(), &ClassContext::default(), &catalog());
        assert!((cache.weight_sum(0, Rarity::Epic, 0) - 4.0).abs() < f64::EPSILON);
        assert_eq!(cache.weight_sum(0, Rarity::Epic, 1), 0.0);
    }

    #[test]
    fn test_weighted_draw_frequencies() {
        let cache = SimulationCache::build(&StatVector::zero(), &ClassContext::default(), &catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let draws = 20_000;
        let damage = (0..draws)
            .filter_map(|_| cache.draw(0, Rarity::Epic, 0, &mut rng))
            .filter(|d| d.stat == StatKind::Damage)
            .count();
        let share = damage as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.02, "damage share {share}");
    }

    #[test]
    fn test_empty_position_draws_nothing() {
        let cache = SimulationCache::build(&StatVector::zero(), &ClassContext::default(), &catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(cache.draw(0, Rarity::Epic, 2, &mut rng), None);
    }

    #[test]
    fn test_stamp_tracks_inputs() {
        let base = StatVector {
            attack: 100.0,
            ..Default::default()
        };
        let context = ClassContext::default();
        let cache = SimulationCache::build(&base, &context, &catalog());
        assert!(cache.is_current_for(&base, &context, &catalog()));

        let changed = base.with(StatKind::Attack, 101.0);
        assert!(!cache.matches_inputs(&changed, &context));

        let mut other_catalog = catalog();
        other_catalog.lines[0].options[0].value = 7.0;
        assert!(!cache.is_current_for(&base, &context, &other_catalog));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no cached lines")]
    fn test_uncached_tier_panics_in_debug() {
        let cache = SimulationCache::build(&StatVector::zero(), &ClassContext::default(), &catalog());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let _ = cache.draw(0, Rarity::Legendary, 0, &mut rng);
    }
}
