//! Cube engine - per-run slot states, budget loop and batch aggregation

use super::cache::SimulationCache;
use super::strategy::{SlotPolicy, SlotView};
use crate::adjust::StatAdjuster;
use crate::batch::{BatchError, BatchRunner, Distribution};
use crate::damage::Scorer;
use crate::types::{Rarity, SlotId, StatDelta};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One slot during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    pub slot: SlotId,
    pub rarity: Rarity,
    pub lines: [Option<StatDelta>; 3],
    /// Cubes used since the last promotion
    pub cubes_at_tier: u32,
    pub cubes_used: u32,
    /// DPS gain in percent of this slot's lines alone
    pub gain: f64,
}

impl SlotState {
    fn new(slot: SlotId, rarity: Rarity) -> Self {
        SlotState {
            slot,
            rarity,
            lines: [None; 3],
            cubes_at_tier: 0,
            cubes_used: 0,
            gain: 0.0,
        }
    }

    pub fn deltas(&self) -> impl Iterator<Item = StatDelta> + '_ {
        self.lines.iter().flatten().copied()
    }

    fn view(&self, index: usize, cache: &SimulationCache) -> SlotView {
        SlotView {
            index,
            gain: self.gain,
            rarity: self.rarity,
            promotion_progress: promotion_progress(self, cache),
            cubes_used: self.cubes_used,
        }
    }
}

fn promotion_progress(state: &SlotState, cache: &SimulationCache) -> f64 {
    if state.rarity.next().is_none() {
        return 0.0;
    }
    match cache.tier(state.rarity).and_then(|t| t.pity) {
        Some(pity) => (f64::from(state.cubes_at_tier) / f64::from(pity)).min(1.0),
        None => 0.0,
    }
}

/// Promotion roll, then a full reroll of all three lines
fn use_cube<R: Rng>(
    state: &mut SlotState,
    index: usize,
    cache: &SimulationCache,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    rng: &mut R,
) {
    let promotion = state
        .rarity
        .next()
        .filter(|next| cache.tier(*next).is_some())
        .zip(cache.tier(state.rarity));
    match promotion {
        Some((next, tier)) => {
            let by_pity = tier.pity.is_some_and(|p| state.cubes_at_tier + 1 >= p);
            let by_roll = rng.gen::<f64>() * 100.0 < tier.promotion_rate;
            if by_pity || by_roll {
                state.rarity = next;
                state.cubes_at_tier = 0;
            } else {
                state.cubes_at_tier += 1;
            }
        }
        None => state.cubes_at_tier += 1,
    }
    state.cubes_used += 1;

    for (position, line) in state.lines.iter_mut().enumerate() {
        *line = cache.draw(index, state.rarity, position, rng);
    }

    let deltas: Vec<StatDelta> = state.deltas().collect();
    let stats = adjuster.apply_all(scorer.base(), &deltas);
    state.gain = scorer.gain_percent(&stats);
}

/// Final state of every slot after one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeRun {
    pub slots: Vec<SlotState>,
    /// DPS gain in percent with every slot's lines applied together
    pub total_gain: f64,
}

/// Spend `budget` cubes one at a time, letting the policy pick the slot
pub fn run_cubes<P, R>(
    cache: &SimulationCache,
    policy: &P,
    budget: u32,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    rng: &mut R,
) -> CubeRun
where
    P: SlotPolicy + ?Sized,
    R: Rng,
{
    let mut slots: Vec<SlotState> = cache
        .slots()
        .iter()
        .map(|slot| SlotState::new(slot.clone(), cache.starting_rarity()))
        .collect();

    if slots.is_empty() {
        return CubeRun {
            slots,
            total_gain: 0.0,
        };
    }

    let mut views: Vec<SlotView> = Vec::with_capacity(slots.len());
    for _ in 0..budget {
        views.clear();
        views.extend(slots.iter().enumerate().map(|(i, s)| s.view(i, cache)));

        let mut chosen = policy.choose_slot(&views);
        if chosen >= slots.len() {
            warn!(chosen, "strategy chose an unknown slot, using the first");
            chosen = 0;
        }
        use_cube(&mut slots[chosen], chosen, cache, scorer, adjuster, rng);
    }

    let deltas: Vec<StatDelta> = slots.iter().flat_map(SlotState::deltas).collect();
    let total_gain = scorer.gain_percent(&adjuster.apply_all(scorer.base(), &deltas));

    CubeRun { slots, total_gain }
}

/// Aggregate performance of one cube strategy over a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeSummary {
    pub strategy: String,
    pub budget: u32,
    pub runs: usize,
    /// Mean total DPS gain in percent
    pub avg_gain: f64,
    /// Mean number of promotions per run, across all slots
    pub avg_promotions: f64,
    pub distribution: Distribution,
    /// Final rarity of every slot of every run
    pub rarity_counts: BTreeMap<Rarity, usize>,
    pub samples: Vec<f64>,
}

/// Simulate a cube strategy over a batch.
///
/// `cache` must have been built from `scorer.base()` and the adjuster's
/// class context; checked in debug builds.
pub fn simulate_cubes<P, F>(
    cache: &SimulationCache,
    policy: &P,
    budget: u32,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    runner: &BatchRunner,
    progress: F,
) -> Result<CubeSummary, BatchError>
where
    P: SlotPolicy + Sync + ?Sized,
    F: FnMut(usize, usize),
{
    debug_assert!(
        cache.matches_inputs(scorer.base(), adjuster.context()),
        "simulation cache was built for different base stats or class"
    );

    let starting = cache.starting_rarity().index();
    let results = runner.run(
        |_, rng| {
            let run = run_cubes(cache, policy, budget, scorer, adjuster, rng);
            let promotions: usize = run
                .slots
                .iter()
                .map(|s| s.rarity.index().saturating_sub(starting))
                .sum();
            let rarities: Vec<Rarity> = run.slots.iter().map(|s| s.rarity).collect();
            (run.total_gain, promotions, rarities)
        },
        progress,
    )?;

    let runs = results.len();
    let n = runs.max(1) as f64;
    let mut rarity_counts = BTreeMap::new();
    for rarity in results.iter().flat_map(|(_, _, r)| r) {
        *rarity_counts.entry(*rarity).or_insert(0) += 1;
    }

    let samples: Vec<f64> = results.iter().map(|(gain, _, _)| *gain).collect();
    let summary = CubeSummary {
        strategy: policy.name(),
        budget,
        runs,
        avg_gain: samples.iter().sum::<f64>() / n,
        avg_promotions: results.iter().map(|(_, p, _)| *p as f64).sum::<f64>() / n,
        distribution: Distribution::from_samples(&samples),
        rarity_counts,
        samples,
    };

    debug!(
        strategy = %summary.strategy,
        avg_gain = summary.avg_gain,
        p10 = summary.distribution.p10,
        "cube strategy simulated"
    );
    Ok(summary)
}

/// Simulate several cube strategies against one cache.
/// Progress is reported as strategies completed.
pub fn compare_cube_strategies<P, F>(
    cache: &SimulationCache,
    policies: &[P],
    budget: u32,
    scorer: &Scorer,
    adjuster: &StatAdjuster,
    runner: &BatchRunner,
    mut progress: F,
) -> Result<Vec<CubeSummary>, BatchError>
where
    P: SlotPolicy + Sync,
    F: FnMut(usize, usize),
{
    let total = policies.len();
    let mut summaries = Vec::with_capacity(total);
    for (i, policy) in policies.iter().enumerate() {
        summaries.push(simulate_cubes(
            cache,
            policy,
            budget,
            scorer,
            adjuster,
            runner,
            |_, _| {},
        )?);
        progress(i + 1, total);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::ClassContext;
    use crate::batch::BatchOptions;
    use crate::cube::catalog::{CubeCatalog, RarityTier};
    use crate::cube::CubeStrategy;
    use crate::damage::{EnemyProfile, Objective};
    use crate::lines::{LineTable, StatLineOption};
    use crate::stat_vector::StatVector;
    use crate::types::StatKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn base() -> StatVector {
        StatVector {
            attack: 1000.0,
            skill_coefficient: 100.0,
            min_damage: 100.0,
            max_damage: 100.0,
            ..Default::default()
        }
    }

    fn scorer() -> Scorer {
        Scorer::new(base(), EnemyProfile::default(), Objective::Boss)
    }

    fn fixed_lines(rarity: Rarity, value: f64) -> Vec<LineTable> {
        (1..=3)
            .map(|line| LineTable {
                rarity,
                line,
                options: vec![StatLineOption::new(StatKind::Damage, value)],
            })
            .collect()
    }

    fn catalog(slots: &[&str], rate: f64, pity: Option<u32>) -> CubeCatalog {
        let mut lines = fixed_lines(Rarity::Rare, 10.0);
        lines.extend(fixed_lines(Rarity::Epic, 20.0));
        CubeCatalog {
            slots: slots.iter().map(|s| SlotId::from(*s)).collect(),
            starting_rarity: Rarity::Rare,
            tiers: vec![
                RarityTier {
                    rarity: Rarity::Rare,
                    promotion_rate: rate,
                    pity,
                },
                RarityTier {
                    rarity: Rarity::Epic,
                    promotion_rate: 0.0,
                    pity: None,
                },
            ],
            lines,
            slot_lines: vec![],
        }
    }

    fn cache(catalog: &CubeCatalog) -> SimulationCache {
        SimulationCache::build(&base(), &ClassContext::default(), catalog)
    }

    #[test]
    fn test_worst_first_single_cube_goes_to_first_slot() {
        let cache = cache(&catalog(&["a", "b", "c"], 0.0, None));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = run_cubes(
            &cache,
            &CubeStrategy::WorstFirst,
            1,
            &scorer(),
            &StatAdjuster::default(),
            &mut rng,
        );
        let used: Vec<u32> = run.slots.iter().map(|s| s.cubes_used).collect();
        assert_eq!(used, vec![1, 0, 0]);
        assert!(run.slots[1].lines.iter().all(Option::is_none));
    }

    #[test]
    fn test_lines_score_against_base() {
        let cache = cache(&catalog(&["a"], 0.0, None));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = run_cubes(
            &cache,
            &CubeStrategy::WorstFirst,
            2,
            &scorer(),
            &StatAdjuster::default(),
            &mut rng,
        );
        // Three +10% damage lines, rerolled twice; the second roll replaces the first
        assert_eq!(run.slots[0].cubes_used, 2);
        assert!((run.slots[0].gain - 30.0).abs() < 1e-9);
        assert!((run.total_gain - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_gain_combines_slots() {
        let cache = cache(&catalog(&["a", "b"], 0.0, None));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = run_cubes(
            &cache,
            &CubeStrategy::WorstFirst,
            2,
            &scorer(),
            &StatAdjuster::default(),
            &mut rng,
        );
        assert_eq!(run.slots[1].cubes_used, 1);
        assert!((run.total_gain - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pity_guarantees_promotion() {
        let cache = cache(&catalog(&["a"], 0.0, Some(3)));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let adjuster = StatAdjuster::default();

        let two = run_cubes(&cache, &CubeStrategy::WorstFirst, 2, &scorer(), &adjuster, &mut rng);
        assert_eq!(two.slots[0].rarity, Rarity::Rare);
        assert_eq!(two.slots[0].cubes_at_tier, 2);

        let three = run_cubes(&cache, &CubeStrategy::WorstFirst, 3, &scorer(), &adjuster, &mut rng);
        assert_eq!(three.slots[0].rarity, Rarity::Epic);
        assert_eq!(three.slots[0].cubes_at_tier, 0);
        // Epic lines roll right after the promotion
        assert!((three.slots[0].gain - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_tier_never_promotes() {
        let mut c = catalog(&["a"], 100.0, None);
        c.starting_rarity = Rarity::Epic;
        let cache = cache(&c);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = run_cubes(
            &cache,
            &CubeStrategy::WorstFirst,
            5,
            &scorer(),
            &StatAdjuster::default(),
            &mut rng,
        );
        assert_eq!(run.slots[0].rarity, Rarity::Epic);
    }

    #[test]
    fn test_simulate_cubes_summary() {
        let cache = cache(&catalog(&["a", "b", "c"], 100.0, None));
        let runner = BatchRunner::new(BatchOptions::seeded(40, 3));
        let summary = simulate_cubes(
            &cache,
            &CubeStrategy::WorstFirst,
            3,
            &scorer(),
            &StatAdjuster::default(),
            &runner,
            |_, _| {},
        )
        .unwrap();
        // Every slot gets one cube and promotes to epic (three +20% lines each)
        assert_eq!(summary.samples.len(), 40);
        assert!((summary.avg_gain - 180.0).abs() < 1e-9);
        assert!((summary.avg_promotions - 3.0).abs() < 1e-12);
        assert_eq!(summary.rarity_counts.get(&Rarity::Epic), Some(&120));
        assert!((summary.distribution.min - summary.distribution.max).abs() < 1e-9);
    }

    #[test]
    fn test_compare_cube_strategies() {
        let cache = cache(&catalog(&["a", "b"], 30.0, Some(4)));
        let runner = BatchRunner::new(BatchOptions::seeded(30, 9));
        let strategies = CubeStrategy::standard_set();
        let mut done = 0;
        let summaries = compare_cube_strategies(
            &cache,
            &strategies,
            10,
            &scorer(),
            &StatAdjuster::default(),
            &runner,
            |completed, _| done = completed,
        )
        .unwrap();
        assert_eq!(summaries.len(), strategies.len());
        assert_eq!(done, strategies.len());
        assert!(summaries.iter().all(|s| s.avg_gain >= 60.0 - 1e-9));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "built for different base stats")]
    fn test_stale_cache_is_rejected() {
        let c = catalog(&["a"], 0.0, None);
        let stale = SimulationCache::build(
            &base().with(StatKind::Attack, 2000.0),
            &ClassContext::default(),
            &c,
        );
        let runner = BatchRunner::new(BatchOptions::seeded(4, 1));
        let _ = simulate_cubes(
            &stale,
            &CubeStrategy::WorstFirst,
            1,
            &scorer(),
            &StatAdjuster::default(),
            &runner,
            |_, _| {},
        );
    }
}
