//! Scenario files - one character, its enemies and the engine settings

use build_core::batch::BatchOptions;
use build_core::config::{
    default_cube_catalog, default_line_catalog, default_scroll_table, load_cube_catalog,
    load_line_catalog, load_scroll_table, load_toml, ConfigError,
};
use build_core::cube::{CubeCatalog, CubeStrategy};
use build_core::scroll::{ScrollStrategy, ScrollTable};
use build_core::search::GreedyScenario;
use build_core::{
    ClassContext, EnemyProfile, GameConstants, LineCatalog, Objective, Rarity, Scorer,
    StatAdjuster, StatVector,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub weapon_attack_bonus: f64,
    /// Raw stat inputs by key; sanitised when the scenario is prepared
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub enemies: EnemyProfile,
    #[serde(default)]
    pub objective: Objective,
    /// Class table override
    #[serde(default)]
    pub constants: Option<PathBuf>,
    #[serde(default)]
    pub batch: BatchOptions,
    #[serde(default)]
    pub scroll: ScrollSettings,
    #[serde(default)]
    pub cube: CubeSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    pub budget: f64,
    /// Table file, relative to the scenario file; shipped table if unset
    pub table: Option<PathBuf>,
    /// Strategies to compare; the table's standard set if empty
    pub strategies: Vec<ScrollStrategy>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        ScrollSettings {
            budget: 50.0,
            table: None,
            strategies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeSettings {
    pub budget: u32,
    pub catalog: Option<PathBuf>,
    pub strategies: Vec<CubeStrategy>,
}

impl Default for CubeSettings {
    fn default() -> Self {
        CubeSettings {
            budget: 200,
            catalog: None,
            strategies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Line catalog for ranking; shipped inner ability table if unset
    pub catalog: Option<PathBuf>,
    pub top: usize,
    pub combination_rarity: Rarity,
    pub combination_lines: usize,
    pub greedy: Vec<GreedyScenario>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            catalog: None,
            top: 10,
            combination_rarity: Rarity::Legendary,
            combination_lines: 3,
            greedy: vec![
                GreedyScenario::new("unique pool", &[Rarity::Unique], 18),
                GreedyScenario::new("legendary pool", &[Rarity::Legendary], 18),
            ],
        }
    }
}

/// Everything the engines need, resolved from a scenario
#[derive(Debug, Clone)]
pub struct Prepared {
    pub name: String,
    pub base: StatVector,
    pub adjuster: StatAdjuster,
    pub scorer: Scorer,
    pub batch: BatchOptions,
    pub scroll_table: ScrollTable,
    pub scroll_strategies: Vec<ScrollStrategy>,
    pub scroll_budget: f64,
    pub cube_catalog: CubeCatalog,
    pub cube_strategies: Vec<CubeStrategy>,
    pub cube_budget: u32,
    pub line_catalog: LineCatalog,
    pub search: SearchSettings,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Scenario, ConfigError> {
        let mut scenario: Scenario = load_toml(path, "scenario")?;
        if scenario.name.is_empty() {
            scenario.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        if let Some(dir) = path.parent() {
            scenario.resolve_paths(dir);
        }
        Ok(scenario)
    }

    /// Make table paths relative to the scenario's directory
    fn resolve_paths(&mut self, dir: &Path) {
        let paths = [
            &mut self.constants,
            &mut self.scroll.table,
            &mut self.cube.catalog,
            &mut self.search.catalog,
        ];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Sanitise inputs, resolve the class and load every table
    pub fn prepare(&self) -> Result<Prepared, ConfigError> {
        let (base, issues) = StatVector::from_inputs(
            self.stats.iter().map(|(key, value)| (key.as_str(), *value)),
        );
        if !issues.is_empty() {
            warn!(count = issues.len(), "stat inputs were repaired or ignored");
        }

        let constants = match &self.constants {
            Some(path) => load_toml(path, "class constants")?,
            None => GameConstants::default(),
        };
        let context =
            ClassContext::resolve(&constants, self.class.as_deref(), self.weapon_attack_bonus);

        let scroll_table = match &self.scroll.table {
            Some(path) => load_scroll_table(path)?,
            None => default_scroll_table(),
        };
        let scroll_strategies = if self.scroll.strategies.is_empty() {
            ScrollStrategy::standard_set(&scroll_table)
        } else {
            self.scroll.strategies.clone()
        };

        let cube_catalog = match &self.cube.catalog {
            Some(path) => load_cube_catalog(path)?,
            None => default_cube_catalog(),
        };
        let cube_strategies = if self.cube.strategies.is_empty() {
            CubeStrategy::standard_set()
        } else {
            self.cube.strategies.clone()
        };

        let line_catalog = match &self.search.catalog {
            Some(path) => load_line_catalog(path)?,
            None => default_line_catalog(),
        };

        if !(self.scroll.budget.is_finite() && self.scroll.budget >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "scroll budget {} must be a non-negative number",
                self.scroll.budget
            )));
        }

        info!(
            scenario = %self.name,
            class = ?context.class,
            "scenario prepared"
        );

        Ok(Prepared {
            name: self.name.clone(),
            scorer: Scorer::new(base, self.enemies, self.objective),
            adjuster: StatAdjuster::new(context),
            base,
            batch: self.batch.clone(),
            scroll_table,
            scroll_strategies,
            scroll_budget: self.scroll.budget,
            cube_catalog,
            cube_strategies,
            cube_budget: self.cube.budget,
            line_catalog,
            search: self.search.clone(),
        })
    }
}
