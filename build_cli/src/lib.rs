//! build_cli - Runs optimizer scenarios from TOML files
//!
//! ```text
//! build_cli <scenario.toml> [damage|scroll|cube|rank|greedy|all] [--json]
//! ```

pub mod report;
pub mod scenario;

use build_core::batch::{BatchError, BatchRunner};
use build_core::config::ConfigError;
use build_core::cube::{compare_cube_strategies, CubeSummary, SimulationCache};
use build_core::scroll::{compare_strategies, ScrollSummary};
use build_core::search::{
    best_combinations, greedy_search, rank_lines, run_scenarios, stat_equivalents,
    GreedyCandidate, GreedyResult, GreedyScenario, RankedCombination, RankedLine,
    StatEquivalent, MAX_LINES,
};
use build_core::{compute_damage, DamageResult};
use scenario::Prepared;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const USAGE: &str =
    "usage: build_cli <scenario.toml> [damage|scroll|cube|rank|greedy|all] [--json]";

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which sections to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Damage,
    Scroll,
    Cube,
    Rank,
    Greedy,
    All,
}

impl Mode {
    fn includes(self, section: Mode) -> bool {
        self == Mode::All || self == section
    }
}

impl FromStr for Mode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damage" => Ok(Mode::Damage),
            "scroll" => Ok(Mode::Scroll),
            "cube" => Ok(Mode::Cube),
            "rank" => Ok(Mode::Rank),
            "greedy" => Ok(Mode::Greedy),
            "all" => Ok(Mode::All),
            other => Err(CliError::Usage(format!("unknown mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub scenario: PathBuf,
    pub mode: Mode,
    pub json: bool,
}

/// Parse arguments (without the program name)
pub fn parse_args<I>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut scenario = None;
    let mut mode = None;
    let mut json = false;

    for arg in args {
        if arg == "--json" {
            json = true;
        } else if arg.starts_with("--") {
            return Err(CliError::Usage(format!("unknown flag '{arg}'")));
        } else if scenario.is_none() {
            scenario = Some(PathBuf::from(arg));
        } else if mode.is_none() {
            mode = Some(arg.parse()?);
        } else {
            return Err(CliError::Usage(format!("unexpected argument '{arg}'")));
        }
    }

    let scenario = scenario.ok_or_else(|| CliError::Usage("missing scenario file".to_string()))?;
    Ok(Args {
        scenario,
        mode: mode.unwrap_or(Mode::All),
        json,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DamageSection {
    pub boss: DamageResult,
    pub normal: DamageResult,
    pub equivalents: Vec<StatEquivalent>,
}

/// Results of every section that ran
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<DamageSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<Vec<ScrollSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cube: Option<Vec<CubeSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<RankedLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinations: Option<Vec<RankedCombination>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greedy: Option<Vec<GreedyResult>>,
}

/// Run the selected sections of a prepared scenario
pub fn run(prepared: &Prepared, mode: Mode) -> Result<RunReport, CliError> {
    let scorer = &prepared.scorer;
    let adjuster = &prepared.adjuster;
    let mut report = RunReport {
        scenario: prepared.name.clone(),
        ..Default::default()
    };

    if mode.includes(Mode::Damage) {
        report.damage = Some(DamageSection {
            boss: compute_damage(&prepared.base, &scorer.enemies().boss()),
            normal: compute_damage(&prepared.base, &scorer.enemies().normal()),
            equivalents: stat_equivalents(scorer, adjuster),
        });
    }

    if mode.includes(Mode::Scroll) {
        let runner = BatchRunner::new(prepared.batch.clone());
        report.scroll = Some(compare_strategies(
            &prepared.scroll_table,
            &prepared.scroll_strategies,
            prepared.scroll_budget,
            scorer,
            adjuster,
            &runner,
            |done, total| debug!(done, total, "scroll strategies"),
        )?);
    }

    if mode.includes(Mode::Cube) {
        let cache = SimulationCache::build(&prepared.base, adjuster.context(), &prepared.cube_catalog);
        let runner = BatchRunner::new(prepared.batch.clone());
        report.cube = Some(compare_cube_strategies(
            &cache,
            &prepared.cube_strategies,
            prepared.cube_budget,
            scorer,
            adjuster,
            &runner,
            |done, total| debug!(done, total, "cube strategies"),
        )?);
    }

    if mode.includes(Mode::Rank) {
        let mut ranked = rank_lines(&prepared.line_catalog, scorer, adjuster);
        ranked.truncate(prepared.search.top);
        report.ranking = Some(ranked);
        report.combinations = Some(best_combinations(
            &prepared.line_catalog,
            prepared.search.combination_rarity,
            prepared.search.combination_lines,
            prepared.search.top,
            scorer,
            adjuster,
        ));
    }

    if mode.includes(Mode::Greedy) {
        let candidates = GreedyCandidate::from_cube_catalog(&prepared.cube_catalog);
        let mut results = run_scenarios(&candidates, &prepared.search.greedy, scorer, adjuster);

        // Inner ability lines are one set: a single rarity, three positions
        let inner = GreedyCandidate::from_line_catalog(&prepared.line_catalog);
        results.push(greedy_search(
            &inner,
            &GreedyScenario::new("inner ability", &[], MAX_LINES),
            scorer,
            adjuster,
        ));
        report.greedy = Some(results);
    }

    Ok(report)
}
