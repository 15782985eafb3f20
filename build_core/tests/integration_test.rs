//! Integration test: Raw inputs -> Damage -> Rank lines -> Scroll -> Cube -> Greedy
//!
//! This test runs the full flow against the shipped data tables.

use build_core::batch::{BatchOptions, BatchRunner, CancelToken};
use build_core::config::{default_cube_catalog, default_line_catalog, default_scroll_table};
use build_core::cube::{compare_cube_strategies, CubeStrategy, SimulationCache};
use build_core::scroll::{compare_strategies, ScrollStrategy};
use build_core::search::{
    best_combinations, rank_lines, run_scenarios, stat_equivalents, GreedyCandidate,
    GreedyScenario,
};
use build_core::{
    compute_damage, BatchError, ClassContext, EnemyProfile, GameConstants, Objective, Rarity,
    Scorer, StatAdjuster, StatVector, Target,
};

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

fn character() -> (StatVector, StatAdjuster) {
    let inputs = [
        ("attack", 2400.0),
        ("crit_rate", 62.0),
        ("crit_damage", 85.0),
        ("stat_damage", 40.0),
        ("damage", 55.0),
        ("boss_damage", 120.0),
        ("normal_damage", 30.0),
        ("min_damage", 70.0),
        ("max_damage", 150.0),
        ("attack_speed", 60.0),
        ("def_pen", 45.0),
        ("final_damage", 12.0),
        ("skill_coefficient", 450.0),
        ("skill_mastery", 20.0),
        ("main_stat", 9000.0),
        ("main_stat_pct", 80.0),
        ("defense", 3000.0),
        ("favourite_colour", 3.0),
    ];
    let (stats, issues) = StatVector::from_inputs(inputs);
    assert_eq!(issues.len(), 1, "only the unknown key is reported");

    let context = ClassContext::resolve(&GameConstants::default(), Some("dark_knight"), 30.0);
    (stats, StatAdjuster::new(context))
}

fn enemies() -> EnemyProfile {
    EnemyProfile {
        boss_defense: 3000.0,
        normal_defense: 500.0,
    }
}

#[test]
fn test_full_optimizer_flow() {
    let (base, adjuster) = character();
    let scorer = Scorer::new(base, enemies(), Objective::Average);

    separator("DAMAGE");
    let boss = compute_damage(&base, &Target::boss(3000.0));
    let normal = compute_damage(&base, &Target::normal(500.0));
    println!("  Boss DPS:   {:.1}", boss.dps);
    println!("  Normal DPS: {:.1}", normal.dps);
    assert!(boss.dps > 0.0 && normal.dps > 0.0);
    assert!(boss.damage_reduction < normal.damage_reduction);

    separator("STAT EQUIVALENTS");
    let equivalents = stat_equivalents(&scorer, &adjuster);
    for eq in equivalents.iter().filter(|e| e.units_per_attack_percent.is_some()) {
        println!("  {:<24} {:>10.4}%", eq.stat.label(), eq.gain_per_unit);
    }

    separator("INNER ABILITY RANKING");
    let ranked = rank_lines(&default_line_catalog(), &scorer, &adjuster);
    for line in ranked.iter().take(5) {
        println!("  {:<40} +{:.2}%", line.description, line.percent_change);
    }
    assert!(!ranked.is_empty());
    assert!(ranked.iter().all(|r| r.avg_dps_gain > 0.0));
    assert!(ranked
        .windows(2)
        .all(|w| w[0].avg_dps_gain >= w[1].avg_dps_gain));

    let combos = best_combinations(
        &default_line_catalog(),
        Rarity::Legendary,
        3,
        5,
        &scorer,
        &adjuster,
    );
    assert_eq!(combos.len(), 5);
    // A three-line set beats the best single legendary line 1
    let best_single = ranked
        .iter()
        .filter(|r| r.rarity == Rarity::Legendary && r.line == 1)
        .map(|r| r.avg_dps_gain)
        .fold(0.0, f64::max);
    assert!(combos[0].gain.avg_dps_gain > best_single);

    separator("SCROLLS");
    let table = default_scroll_table();
    let runner = BatchRunner::new(BatchOptions::seeded(300, 42));
    let strategies = ScrollStrategy::standard_set(&table);
    let scrolls = compare_strategies(
        &table,
        &strategies,
        40.0,
        &scorer,
        &adjuster,
        &runner,
        |_, _| {},
    )
    .unwrap();
    for s in &scrolls {
        println!(
            "  {:<40} {:>6.2}%  resets {:.1}  spent {:.1}",
            s.strategy, s.avg_gain, s.avg_resets, s.avg_spent
        );
        assert!(s.samples.iter().all(|g| *g >= 0.0));
    }
    assert_eq!(scrolls.len(), strategies.len());

    separator("CUBES");
    let catalog = default_cube_catalog();
    let cache = SimulationCache::build(scorer.base(), adjuster.context(), &catalog);
    let runner = BatchRunner::new(BatchOptions::seeded(100, 42));
    let cubes = compare_cube_strategies(
        &cache,
        &CubeStrategy::standard_set(),
        120,
        &scorer,
        &adjuster,
        &runner,
        |_, _| {},
    )
    .unwrap();
    for c in &cubes {
        println!(
            "  {:<40} mean {:>6.2}%  p10 {:>6.2}%  p90 {:>6.2}%",
            c.strategy, c.avg_gain, c.distribution.p10, c.distribution.p90
        );
        let slots: usize = c.rarity_counts.values().sum();
        assert_eq!(slots, 100 * catalog.slots.len());
        assert!(c.distribution.min <= c.distribution.p50);
        assert!(c.distribution.p50 <= c.distribution.max);
    }

    separator("GREEDY");
    let candidates = GreedyCandidate::from_cube_catalog(&catalog);
    let results = run_scenarios(
        &candidates,
        &[
            GreedyScenario::new("unique pool", &[Rarity::Unique], 18),
            GreedyScenario::new("legendary pool", &[Rarity::Legendary], 18),
        ],
        &scorer,
        &adjuster,
    );
    for result in &results {
        println!("  {}: +{:.2}%", result.scenario, result.total.percent_change);
    }
    assert!(results[1].total.percent_change > results[0].total.percent_change);
    assert!(results.iter().all(|r| r.picks.len() <= 18));
}

#[test]
fn test_batches_are_reproducible() {
    let (base, adjuster) = character();
    let scorer = Scorer::new(base, enemies(), Objective::Boss);
    let catalog = default_cube_catalog();
    let cache = SimulationCache::build(&base, adjuster.context(), &catalog);

    let run = |parallel: bool| {
        let options = BatchOptions {
            parallel,
            ..BatchOptions::seeded(120, 7)
        };
        build_core::cube::simulate_cubes(
            &cache,
            &CubeStrategy::BelowAverage,
            60,
            &scorer,
            &adjuster,
            &BatchRunner::new(options),
            |_, _| {},
        )
        .unwrap()
    };

    let sequential = run(false);
    let again = run(false);
    let sharded = run(true);
    assert_eq!(sequential.samples, again.samples);
    assert_eq!(sequential.samples, sharded.samples);
}

#[test]
fn test_cancelled_batch_returns_no_results() {
    let (base, adjuster) = character();
    let scorer = Scorer::new(base, enemies(), Objective::Boss);
    let table = default_scroll_table();

    let cancel = CancelToken::new();
    let runner = BatchRunner::new(BatchOptions {
        chunk_size: 10,
        ..BatchOptions::seeded(100, 1)
    })
    .with_cancel(cancel.clone());

    let result = build_core::scroll::simulate_strategy(
        &table,
        &ScrollStrategy::Fixed { action: 0 },
        30.0,
        &scorer,
        &adjuster,
        &runner,
        |completed, _| {
            if completed >= 20 {
                cancel.cancel();
            }
        },
    );
    assert_eq!(
        result.unwrap_err(),
        BatchError::Cancelled {
            completed: 20,
            total: 100
        }
    );
}
