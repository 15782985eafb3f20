//! Prelude module for convenient imports
//!
//! ```rust
//! use build_core::prelude::*;
//! ```

// Core types
pub use crate::stat_vector::StatVector;
pub use crate::types::{MonsterClass, Rarity, SlotId, StatDelta, StatKind};

// Damage model
pub use crate::damage::{compute_damage, DamageResult, EnemyProfile, Objective, Scorer, Target};

// Stat algebra
pub use crate::adjust::{ClassContext, StatAdjuster};

// Engines
pub use crate::batch::{BatchOptions, BatchRunner, CancelToken};
pub use crate::cube::{simulate_cubes, CubeStrategy, SimulationCache, SlotPolicy};
pub use crate::scroll::{simulate_strategy, ScrollPolicy, ScrollStrategy};
pub use crate::search::{best_combinations, greedy_search, rank_lines, GreedyScenario};

// Config
pub use crate::config::{
    default_cube_catalog, default_line_catalog, default_scroll_table, GameConstants,
};
